use std::sync::mpsc;

use crate::render::surface::LayoutBox;

/// Source of layout changes for the drawing surfaces placed in it.
#[derive(Debug)]
pub struct Viewport {
    layout: LayoutBox,
    observers: Vec<mpsc::Sender<LayoutBox>>,
}

impl Viewport {
    /// Viewport with an initial layout.
    pub fn new(layout: LayoutBox) -> Self {
        Self {
            layout,
            observers: Vec::new(),
        }
    }

    /// Current layout.
    pub fn layout(&self) -> LayoutBox {
        self.layout
    }

    /// Register for layout changes. Dropping the observer unregisters it.
    pub fn observe(&mut self) -> ResizeObserver {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        ResizeObserver { rx }
    }

    /// Apply a new layout and notify live observers; dropped observers are pruned here.
    pub fn resize(&mut self, layout: LayoutBox) {
        self.layout = layout;
        self.observers.retain(|tx| tx.send(layout).is_ok());
    }

    /// Registered observers (pruned lazily on [`Viewport::resize`]).
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

/// Receiving end of a [`Viewport`] subscription.
#[derive(Debug)]
pub struct ResizeObserver {
    rx: mpsc::Receiver<LayoutBox>,
}

impl ResizeObserver {
    /// Most recent layout since the last call, coalescing bursts of resizes.
    pub fn latest(&self) -> Option<LayoutBox> {
        self.rx.try_iter().last()
    }
}
