// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Note, NoteId};

use super::canvas::CanvasStore;
use super::navigation::NavigationStore;
use super::MutateOutcome;

/// Couples the canvas and navigation stores.
///
/// The canvas tables hold the open note's live graph; a note's own
/// `cards`/`connections` are its parked snapshot. Every switch parks the
/// outgoing graph and loads the incoming one, so the two stores cannot drift
/// apart.
#[derive(Debug, Default)]
pub struct Workspace {
    canvas: CanvasStore,
    navigation: NavigationStore,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas(&self) -> &CanvasStore {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasStore {
        &mut self.canvas
    }

    pub fn navigation(&self) -> &NavigationStore {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationStore {
        &mut self.navigation
    }

    /// Creates a fresh note and opens it on an empty canvas, parking whatever
    /// was open before.
    pub fn create_note(&mut self, title: impl Into<String>) -> NoteId {
        self.park_current_graph();
        let note_id = self.navigation.create_note(title);
        self.canvas.load_graph(Vec::new(), Vec::new());
        note_id
    }

    /// Opens a known note: parks the outgoing graph, selects the note
    /// (refreshing its timestamp), and loads its parked graph into the canvas.
    /// Unknown ids touch nothing.
    pub fn open_note(&mut self, note_id: &NoteId) -> MutateOutcome {
        if self.navigation.note(note_id).is_none() {
            return MutateOutcome::NotFound;
        }
        self.park_current_graph();
        let outcome = self.navigation.select_note(note_id);
        if let Some(note) = self.navigation.note(note_id) {
            let cards = note.cards().to_vec();
            let connections = note.connections().to_vec();
            self.canvas.load_graph(cards, connections);
        }
        outcome
    }

    /// Parks the open graph and returns to the home view.
    pub fn go_home(&mut self) {
        self.park_current_graph();
        self.navigation.navigate_to_home();
    }

    /// Installs a note freshly rebuilt from backend sync: upserts it into the
    /// catalogue, makes it current, and loads its graph into the canvas.
    pub fn hydrate_note(&mut self, note: Note) -> NoteId {
        self.park_current_graph();
        let note_id = note.note_id().clone();
        let cards = note.cards().to_vec();
        let connections = note.connections().to_vec();
        self.navigation.upsert_synced_note(note);
        let _ = self.navigation.select_note(&note_id);
        self.canvas.load_graph(cards, connections);
        note_id
    }

    fn park_current_graph(&mut self) {
        if let Some(note_id) = self.navigation.current_note().cloned() {
            let (cards, connections) = self.canvas.snapshot_graph();
            let _ = self.navigation.store_note_graph(&note_id, cards, connections);
        }
    }
}
