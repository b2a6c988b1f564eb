use crate::dashboard::store::BookingReceipt;

/// Review drawer: closed, or open on one candidate. While open it remembers the
/// last booking made from it so the confirmation stays visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawerState {
    #[default]
    Closed,
    Open {
        candidate_id: String,
        booking: Option<BookingReceipt>,
    },
}

impl DrawerState {
    pub fn open(&mut self, candidate_id: String) {
        *self = DrawerState::Open {
            candidate_id,
            booking: None,
        };
    }

    pub fn close(&mut self) {
        *self = DrawerState::Closed;
    }

    pub fn active_candidate(&self) -> Option<&str> {
        match self {
            DrawerState::Open { candidate_id, .. } => Some(candidate_id.as_str()),
            DrawerState::Closed => None,
        }
    }

    pub fn last_booking(&self) -> Option<&BookingReceipt> {
        match self {
            DrawerState::Open { booking, .. } => booking.as_ref(),
            DrawerState::Closed => None,
        }
    }

    /// No-op when closed.
    pub fn record_booking(&mut self, receipt: BookingReceipt) {
        if let DrawerState::Open { booking, .. } = self {
            *booking = Some(receipt);
        }
    }
}
