//! Undo history of committed strokes.
//!
//! Each entry is the full raster after one committed stroke, so undo never
//! replays strokes: it blanks the surface and restores the previous entry.
//! The visible surface therefore always equals either blank (empty history)
//! or the last entry, except while a stroke is being drawn.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::surface::{DrawingSurface, SurfaceError};

/// Ordered full-raster snapshots, one per committed stroke.
#[derive(Debug, Clone)]
pub struct StrokeHistory<T> {
    entries: Vec<T>,
}

impl<T> Default for StrokeHistory<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: Clone> StrokeHistory<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent snapshot, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Append the raster of a just-committed stroke.
    pub fn commit(&mut self, snapshot: T) {
        self.entries.push(snapshot);
    }

    /// Drop the last stroke and show the one before it.
    ///
    /// Returns `Ok(false)` without touching the surface when the history is
    /// already empty.
    ///
    /// # Errors
    ///
    /// Returns the surface error if blanking or restoring fails. The entry is
    /// only removed once the surface shows the previous state, so a failed
    /// undo leaves both the surface and the history as they were.
    pub fn undo<S>(&mut self, surface: &mut S) -> Result<bool, SurfaceError>
    where
        S: DrawingSurface<Snapshot = T>,
    {
        let Some(last) = self.entries.len().checked_sub(1) else {
            return Ok(false);
        };
        match last.checked_sub(1) {
            // Snapshots are full rasters; restoring overwrites every pixel.
            Some(previous) => surface.restore(&self.entries[previous])?,
            None => surface.blank()?,
        }
        self.entries.pop();
        Ok(true)
    }

    /// Blank the surface and forget every stroke.
    ///
    /// # Errors
    ///
    /// Returns the surface error if blanking fails; the history is emptied
    /// regardless.
    pub fn clear<S>(&mut self, surface: &mut S) -> Result<(), SurfaceError>
    where
        S: DrawingSurface<Snapshot = T>,
    {
        self.entries.clear();
        surface.blank()
    }
}
