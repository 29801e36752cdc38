/// Split percentages for the document / annotation regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitBounds {
    pub default_percent: f32,
    pub min_percent: f32,
    pub max_percent: f32,
}

impl Default for SplitBounds {
    fn default() -> Self {
        Self {
            default_percent: 60.0,
            min_percent: 15.0,
            max_percent: 85.0,
        }
    }
}

impl SplitBounds {
    pub fn clamp(&self, percent: f32) -> f32 {
        percent.clamp(self.min_percent, self.max_percent)
    }
}

/// Vertical extent of the container holding both regions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open {
        /// Share of the container given to the document view.
        split_percent: f32,
        dragging: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelLayout {
    bounds: SplitBounds,
    state: PanelState,
}

impl PanelLayout {
    pub fn new(bounds: SplitBounds) -> Self {
        Self {
            bounds,
            state: PanelState::Closed,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PanelState::Open { dragging: true, .. })
    }

    /// Opens at the default split. An already open panel keeps its split.
    pub fn open(&mut self) {
        if let PanelState::Closed = self.state {
            self.state = PanelState::Open {
                split_percent: self.bounds.clamp(self.bounds.default_percent),
                dragging: false,
            };
        }
    }

    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    /// Returns false when there is no open divider to grab.
    pub fn press(&mut self) -> bool {
        match &mut self.state {
            PanelState::Open { dragging, .. } => {
                *dragging = true;
                true
            }
            PanelState::Closed => false,
        }
    }

    /// Recomputes the split from the pointer position while dragging.
    /// Returns whether the split changed.
    pub fn drag_to(&mut self, pointer_y: f32, container: ContainerBounds) -> bool {
        let bounds = self.bounds;
        match &mut self.state {
            PanelState::Open {
                split_percent,
                dragging: true,
            } => {
                if !container.height.is_finite()
                    || container.height <= 0.0
                    || !container.top.is_finite()
                    || !pointer_y.is_finite()
                {
                    return false;
                }
                let raw = (pointer_y - container.top) / container.height * 100.0;
                let next = bounds.clamp(raw);
                let changed = next != *split_percent;
                *split_percent = next;
                changed
            }
            _ => false,
        }
    }

    pub fn release(&mut self) -> bool {
        match &mut self.state {
            PanelState::Open { dragging, .. } if *dragging => {
                *dragging = false;
                true
            }
            _ => false,
        }
    }

    pub fn split_percent(&self) -> Option<f32> {
        match self.state {
            PanelState::Open { split_percent, .. } => Some(split_percent),
            PanelState::Closed => None,
        }
    }

    pub fn document_percent(&self) -> f32 {
        self.split_percent().unwrap_or(100.0)
    }

    pub fn annotation_percent(&self) -> f32 {
        100.0 - self.document_percent()
    }
}
