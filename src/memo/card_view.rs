use crate::core::Card;

/// Receives check changes from a card view. Called synchronously from the
/// interaction that caused them.
pub trait CheckListener {
    fn notify_checked(&mut self, index: usize, value: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

/// Presentation state of a single flip card.
#[derive(Debug, Clone)]
pub struct CardView {
    index: usize,
    front: String,
    back: String,
    checked: bool,
    flipped: bool,
}

impl CardView {
    pub fn new(index: usize, card: &Card) -> Self {
        Self {
            index,
            front: card.front.clone(),
            back: card.back.clone(),
            checked: card.is_checked,
            flipped: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn face(&self) -> Face {
        if self.flipped {
            Face::Back
        } else {
            Face::Front
        }
    }

    pub fn visible_text(&self) -> &str {
        match self.face() {
            Face::Front => &self.front,
            Face::Back => &self.back,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn badge(&self) -> &'static str {
        if self.checked {
            "[x]"
        } else {
            "[ ]"
        }
    }

    pub fn set_checked(&mut self, value: bool, listener: &mut dyn CheckListener) {
        self.checked = value;
        listener.notify_checked(self.index, value);
    }

    pub fn toggle_checked(&mut self, listener: &mut dyn CheckListener) {
        self.set_checked(!self.checked, listener);
    }

    /// One line for list output showing the visible face only.
    pub fn render_line(&self) -> String {
        format!("{:>3} {} {}", self.index, self.badge(), self.visible_text())
    }

    pub fn render_revealed(&self) -> String {
        format!("{:>3} {} {} -> {}", self.index, self.badge(), self.front, self.back)
    }
}
