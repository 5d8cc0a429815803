//! Terminal word picker for Wordwalk.
//!
//! [`TerminalSelector`] implements [`WordSelector`] with a full-screen
//! ratatui list: one [`TerminalSession`] per round, input from an
//! [`InputPump`], state in [`SelectionState`].

mod input;
mod render;
mod session;
mod theme;

pub use input::{InputPump, map_event, map_key};
pub use render::{ListLayout, ListView, draw_selection};
pub use session::TerminalSession;
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use anyhow::Result;
use wordwalk_engine::{
    CandidatePool, Selection, SelectionState, SelectionStep, UiOptions, WordSelector,
};

/// Interactive multi-select list in the alternate screen.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSelector {
    palette: Palette,
    glyphs: Glyphs,
}

impl TerminalSelector {
    #[must_use]
    pub fn new(options: UiOptions) -> Self {
        Self {
            palette: palette(options),
            glyphs: glyphs(options),
        }
    }

    async fn run(
        &self,
        session: &mut TerminalSession,
        input: &mut InputPump,
        pool: &CandidatePool,
        round: usize,
    ) -> Result<Selection> {
        let mut state = SelectionState::new(pool);
        let mut view = ListView::default();

        loop {
            let mut layout = ListLayout::default();
            session.terminal.draw(|frame| {
                layout = draw_selection(
                    frame,
                    &state,
                    &mut view,
                    round,
                    &self.palette,
                    &self.glyphs,
                );
            })?;
            state.set_page_size(layout.visible_rows());

            let event = input.next().await?;
            let Some(action) = map_event(&event, &layout) else {
                continue;
            };
            if let SelectionStep::Done(selection) = state.apply(action) {
                return Ok(selection);
            }
        }
    }
}

impl WordSelector for TerminalSelector {
    async fn select(&mut self, pool: &CandidatePool, round: usize) -> Result<Selection> {
        let mut session = TerminalSession::new()?;
        let mut input = InputPump::new();

        let result = self.run(&mut session, &mut input, pool, round).await;

        input.shutdown().await;
        drop(session);

        if let Ok(selection) = &result {
            tracing::debug!(round, selected = selection.len(), "Selection confirmed");
        }
        result
    }
}
