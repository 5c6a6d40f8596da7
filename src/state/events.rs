use crate::render::brush::BrushEvent;
use crate::render::transform::ZoomGesture;
use crate::state::filter_state::{DistanceBand, Outcome};
use crate::state::record::RecordId;

/// A change to one of the non-brush filter criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Actor { name: String, selected: bool },
    AllActors(bool),
    Group { name: String, selected: bool },
    AllGroups(bool),
    Outcome(Outcome),
    Band(DistanceBand),
}

/// Pointer activity over the scatter surface, in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverEvent {
    Move { pos: [f64; 2] },
    Leave,
}

/// Every interaction a mounted chart reacts to. Each is handled to
/// completion (state change, recompute, redraw) before the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    Filter(FilterChange),
    Brush(BrushEvent),
    Zoom(ZoomGesture),
    Hover(HoverEvent),
}

impl ChartEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChartEvent::Filter(_) => EventKind::Filter,
            ChartEvent::Brush(_) => EventKind::Brush,
            ChartEvent::Zoom(_) => EventKind::Zoom,
            ChartEvent::Hover(_) => EventKind::Hover,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Filter,
    Brush,
    Zoom,
    Hover,
}

/// What a handled event did, passed to listeners after the redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    /// Whether any chart state changed.
    pub changed: bool,
    pub visible_count: usize,
    pub hovered: Option<RecordId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(&ChartEvent, &EventOutcome)>;

/// Registered observers of chart events. Listeners are detached one at a
/// time with `unsubscribe` or all at once when the chart unmounts.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, EventKind, Handler)>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id)
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&ChartEvent, &EventOutcome) + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push((id, kind, Box::new(handler)));
        id
    }

    /// Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn notify(&mut self, event: &ChartEvent, outcome: &EventOutcome) {
        let kind = event.kind();
        for (_, entry_kind, handler) in &mut self.entries {
            if *entry_kind == kind {
                handler(event, outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn outcome() -> EventOutcome {
        EventOutcome { changed: true, visible_count: 0, hovered: None }
    }

    #[test]
    fn listeners_only_see_their_kind_until_detached() {
        let hits = Rc::new(Cell::new(0));
        let mut listeners = Listeners::default();
        let counter = Rc::clone(&hits);
        let id = listeners.subscribe(EventKind::Zoom, move |_, _| counter.set(counter.get() + 1));

        let zoom = ChartEvent::Zoom(ZoomGesture::Reset);
        let hover = ChartEvent::Hover(HoverEvent::Leave);
        listeners.notify(&zoom, &outcome());
        listeners.notify(&hover, &outcome());
        assert_eq!(hits.get(), 1);

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.notify(&zoom, &outcome());
        assert_eq!(hits.get(), 1);
    }
}
