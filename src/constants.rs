//! Fixed width layout of Observation RINEX,
//! shared by the header scanner and both record decoders.

/// Header section layout
pub(crate) struct HeaderLayout;

impl HeaderLayout {
    /// Header content: anything past this is the label
    pub const DATA_WIDTH: usize = 60;
    /// Header / record separator
    pub const END_OF_HEADER: &'static str = "END OF HEADER";
    pub const VERSION_TYPE: &'static str = "RINEX VERSION / TYPE";
    pub const TIME_OF_FIRST_OBS: &'static str = "TIME OF FIRST OBS";
    /// RINEX 2 observables (continued on several lines)
    pub const V2_OBS_TYPES: &'static str = "# / TYPES OF OBSERV";
    /// RINEX 3/4 observables, per system (continued on several lines)
    pub const V3_OBS_TYPES: &'static str = "SYS / # / OBS TYPES";
    /// [Self::VERSION_TYPE] version field
    pub const VERSION_END: usize = 9;
    /// [Self::VERSION_TYPE] file type letter
    pub const TYPE_OFFSET: usize = 20;
    /// [Self::VERSION_TYPE] system letter
    pub const SYSTEM_OFFSET: usize = 40;
    /// [Self::TIME_OF_FIRST_OBS] time system field
    pub const TIME_SYSTEM_START: usize = 48;
    pub const TIME_SYSTEM_END: usize = 51;
}

/// Observation field layout, common to all revisions
pub(crate) struct ObsLayout;

impl ObsLayout {
    /// SVNN: constellation letter + 2 digit PRN
    pub const PRN_WIDTH: usize = 3;
    /// F14.3 observed value
    pub const VALUE_WIDTH: usize = 14;
    /// Loss of lock indicator
    pub const LLI_WIDTH: usize = 1;
    /// Signal strength indicator
    pub const SSI_WIDTH: usize = 1;
    /// Complete (value, LLI, SSI) field
    pub const FIELD_WIDTH: usize = Self::VALUE_WIDTH + Self::LLI_WIDTH + Self::SSI_WIDTH;
}

/// RINEX 2 specific layout
pub(crate) struct V2Layout;

impl V2Layout {
    /// Number of satellites: I3 field
    pub const NUM_SAT_START: usize = 29;
    pub const NUM_SAT_END: usize = 32;
    /// Satellite list, on epoch line and continuation lines
    pub const SAT_LIST_START: usize = 32;
    /// Maximal number of satellites per line
    pub const SATS_PER_LINE: usize = 12;
    pub const SAT_LIST_END: usize =
        Self::SAT_LIST_START + Self::SATS_PER_LINE * ObsLayout::PRN_WIDTH;
    /// Maximal number of observations per line
    pub const OBS_PER_LINE: usize = 5;
    /// Observation line, once padded
    pub const OBS_LINE_WIDTH: usize = Self::OBS_PER_LINE * ObsLayout::FIELD_WIDTH;
    /// Epoch flag field
    pub const FLAG_START: usize = 26;
    pub const FLAG_END: usize = 29;
}

/// RINEX 3/4 specific layout
pub(crate) struct V3Layout;

impl V3Layout {
    /// Epoch marker
    pub const EPOCH_MARKER: char = '>';
    /// Epoch flag field (marker included)
    pub const FLAG_START: usize = 29;
    pub const FLAG_END: usize = 32;
    /// Number of satellites: I3 field
    pub const NUM_SAT_START: usize = 32;
    pub const NUM_SAT_END: usize = 35;
}
