// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use time::OffsetDateTime;

use crate::model::{Card, Connection, MapId, Note, NoteId};

use super::MutateOutcome;

/// Which surface the app is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Home,
    Canvas,
}

/// Tracks the note catalogue and which note is open.
///
/// Holds note metadata and parked graph snapshots; the open note's live graph
/// lives in the canvas store. The two are kept in step by `Workspace`.
#[derive(Debug, Default)]
pub struct NavigationStore {
    current_view: View,
    current_note: Option<NoteId>,
    notes: Vec<Note>,
}

impl NavigationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty note, makes it current, and switches to the canvas.
    pub fn create_note(&mut self, title: impl Into<String>) -> NoteId {
        let note = Note::new(NoteId::generate(), title, OffsetDateTime::now_utc());
        let note_id = note.note_id().clone();
        self.notes.push(note);
        self.current_note = Some(note_id.clone());
        self.current_view = View::Canvas;
        note_id
    }

    /// Makes the note current, refreshes its `updated_at`, and switches to the
    /// canvas. Unknown ids touch nothing, not even the view.
    pub fn select_note(&mut self, note_id: &NoteId) -> MutateOutcome {
        let Some(note) = self.note_mut(note_id) else {
            return MutateOutcome::NotFound;
        };
        note.touch(OffsetDateTime::now_utc());
        self.current_note = Some(note_id.clone());
        self.current_view = View::Canvas;
        MutateOutcome::Applied
    }

    /// Refreshes `updated_at` only. The canvas flow calls this whenever the
    /// open note's graph changes, since graph and metadata live in different
    /// stores.
    pub fn update_note_timestamp(&mut self, note_id: &NoteId) -> MutateOutcome {
        let Some(note) = self.note_mut(note_id) else {
            return MutateOutcome::NotFound;
        };
        note.touch(OffsetDateTime::now_utc());
        MutateOutcome::Applied
    }

    pub fn rename_note(&mut self, note_id: &NoteId, title: impl Into<String>) -> MutateOutcome {
        let Some(note) = self.note_mut(note_id) else {
            return MutateOutcome::NotFound;
        };
        note.set_title(title);
        note.touch(OffsetDateTime::now_utc());
        MutateOutcome::Applied
    }

    /// Records the backend map backing this note once the create round trip
    /// has come back.
    pub fn attach_backend_map(&mut self, note_id: &NoteId, map_id: MapId) -> MutateOutcome {
        let Some(note) = self.note_mut(note_id) else {
            return MutateOutcome::NotFound;
        };
        note.set_backend_id(Some(map_id));
        note.touch(OffsetDateTime::now_utc());
        MutateOutcome::Applied
    }

    pub fn navigate_to_home(&mut self) {
        self.current_view = View::Home;
    }

    /// Switches to the canvas; with no id given the current note is kept.
    pub fn navigate_to_canvas(&mut self, note_id: Option<NoteId>) {
        if let Some(note_id) = note_id {
            self.current_note = Some(note_id);
        }
        self.current_view = View::Canvas;
    }

    /// Writes a graph snapshot into a note, refreshing its `updated_at`.
    pub fn store_note_graph(
        &mut self,
        note_id: &NoteId,
        cards: Vec<Card>,
        connections: Vec<Connection>,
    ) -> MutateOutcome {
        let Some(note) = self.note_mut(note_id) else {
            return MutateOutcome::NotFound;
        };
        note.set_cards(cards);
        note.set_connections(connections);
        note.touch(OffsetDateTime::now_utc());
        MutateOutcome::Applied
    }

    /// Replaces a note wholesale, matched by id.
    pub fn replace_note(&mut self, note: Note) -> MutateOutcome {
        let Some(slot) = self
            .notes
            .iter_mut()
            .find(|existing| existing.note_id() == note.note_id())
        else {
            return MutateOutcome::NotFound;
        };
        *slot = note;
        MutateOutcome::Applied
    }

    /// Inserts or replaces a note coming back from backend sync, matched by
    /// backend map id first, local id second.
    pub fn upsert_synced_note(&mut self, note: Note) {
        let slot = self.notes.iter_mut().find(|existing| {
            (note.backend_id().is_some() && existing.backend_id() == note.backend_id())
                || existing.note_id() == note.note_id()
        });
        match slot {
            Some(slot) => *slot = note,
            None => self.notes.push(note),
        }
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn current_note(&self) -> Option<&NoteId> {
        self.current_note.as_ref()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, note_id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.note_id() == note_id)
    }

    fn note_mut(&mut self, note_id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.note_id() == note_id)
    }
}
