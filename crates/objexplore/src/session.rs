//! The exploration session loop
//!
//! A session alternates between rendering the current [`ViewState`] and
//! dispatching the next [`InputEvent`] until the user exits, returns a
//! member, or the event stream ends. Events come from an [`EventSource`]
//! and views go to a [`Renderer`], so the loop knows nothing about
//! terminals.

use crate::explorer::Explorer;
use crate::input::{Control, InputEvent};
use crate::object::{Explorable, ObjectRef};
use crate::options::ExplorerOptions;
use crate::view::ViewState;
use anyhow::{Context, Result};
use log::info;
use std::collections::VecDeque;

/// Supplies input events to a session
pub trait EventSource {
    /// Wait for the next event; `None` ends the session
    fn next_event(&mut self) -> Result<Option<InputEvent>>;
}

/// Draws views produced by a session
pub trait Renderer {
    /// Draw one frame
    fn render(&mut self, view: &ViewState) -> Result<()>;

    /// Rows available to the member list, used for paging and scrolling
    fn viewport_height(&self) -> usize {
        20
    }
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        (**self).next_event()
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, view: &ViewState) -> Result<()> {
        (**self).render(view)
    }

    fn viewport_height(&self) -> usize {
        (**self).viewport_height()
    }
}

/// How a session ended
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The user quit, or the event stream ended
    Exited,
    /// The user picked a member to hand back
    Selected(ObjectRef),
}

impl Outcome {
    /// The returned object, if any
    pub fn selected(&self) -> Option<&ObjectRef> {
        match self {
            Outcome::Selected(value) => Some(value),
            Outcome::Exited => None,
        }
    }
}

/// A fixed queue of events, ending the session when drained
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    events: VecDeque<InputEvent>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        events.into_iter().collect()
    }

    /// Events not consumed yet
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl FromIterator<InputEvent> for ScriptedEvents {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}

/// Drive `explorer` until the session ends
///
/// The current view is rendered before every event is read, so the
/// renderer always sees the state the user acts on.
pub fn run<S, R>(explorer: &mut Explorer<'_>, mut source: S, mut renderer: R) -> Result<Outcome>
where
    S: EventSource,
    R: Renderer,
{
    loop {
        explorer.set_viewport_height(renderer.viewport_height());
        renderer
            .render(&explorer.view())
            .context("failed to render the explorer view")?;

        let Some(event) = source
            .next_event()
            .context("failed to read the next input event")?
        else {
            info!("input ended, leaving the explorer");
            return Ok(Outcome::Exited);
        };

        match explorer.dispatch(event) {
            Control::Continue => {}
            Control::Exit => {
                info!("explorer exited at `{}`", explorer.tree().dotpath());
                return Ok(Outcome::Exited);
            }
            Control::Return(value) => {
                info!("returning a {} from the explorer", value.type_name());
                return Ok(Outcome::Selected(value));
            }
        }
    }
}

/// Explore `object` with the given event source and renderer
pub fn explore_with<S, R>(
    object: &dyn Explorable,
    options: ExplorerOptions,
    source: S,
    renderer: R,
) -> Result<Outcome>
where
    S: EventSource,
    R: Renderer,
{
    let mut explorer = Explorer::new(object, options);
    info!(
        "exploring a {} with {} members",
        object.type_name(),
        explorer.tree().current_node().members().len()
    );
    run(&mut explorer, source, renderer)
}
