//! Per-port state machine states

use super::media::MediaKind;

/// State of one port
///
/// Copper ports run `SetupSpeedMode -> WaitingForLink <-> LinkUp`. Serdes
/// ports run `SigSetup -> SetUpMode -> WaitingForLink <-> LinkUp`, falling
/// back to `SetUpMode` whenever the module goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortState {
    /// Administratively off or not wired; never polled
    #[default]
    Disabled,
    /// Program the PHY advertisement and restart negotiation
    SetupSpeedMode,
    /// Link down, sampled on every poll tick
    WaitingForLink,
    /// Link up, sampled on every poll tick
    LinkUp,
    /// Configure the SFP cage signals
    SigSetup,
    /// Look for a module and match the Serdes to it
    SetUpMode,
}

impl PortState {
    /// First state of an enabled port with `media`
    pub const fn initial(media: MediaKind) -> Self {
        if media.is_copper() {
            Self::SetupSpeedMode
        } else if media.is_serdes() {
            Self::SigSetup
        } else {
            Self::Disabled
        }
    }

    /// States that only act when the poll flag fired
    pub const fn is_sampled(self) -> bool {
        matches!(self, Self::WaitingForLink | Self::LinkUp)
    }
}
