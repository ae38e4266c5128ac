//! Presentation drift correction
//!
//! Host pages sometimes restyle or hide foreign nodes. Whenever the host's
//! attribute observer reports a change, the observed presentation is compared
//! with what the state machine wants and corrected if an external actor hid a
//! panel that should be on screen. The controller's own transitions always
//! write the desired presentation, so they never trigger a correction.

use super::state::Visibility;
use crate::shared::types::Presentation;

/// Presentation the node should carry in `visibility`; `None` means no node
pub fn desired_presentation(visibility: Visibility) -> Option<Presentation> {
    match visibility {
        Visibility::Hidden => None,
        Visibility::Appearing => Some(Presentation::ENTERING),
        Visibility::Visible => Some(Presentation::VISIBLE),
        Visibility::Disappearing => Some(Presentation::LEAVING),
    }
}

/// The presentation to force back onto the node, if it drifted
pub fn reconcile(visibility: Visibility, observed: Option<Presentation>) -> Option<Presentation> {
    let observed = observed?;
    if visibility.is_showing() && !observed.displayed {
        desired_presentation(visibility)
    } else {
        None
    }
}
