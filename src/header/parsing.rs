//! Header section parsing
use std::str::FromStr;

use gnss_rs::prelude::Constellation;
use hifitime::TimeScale;

use crate::{
    catalog::ObservableCatalog,
    constants::HeaderLayout,
    epoch::timescale_from_system,
    error::ParsingError,
    fixed_field,
    header::Header,
    version::Version,
};

use log::debug;

/// Locates the `END OF HEADER` line
pub(crate) fn end_of_header(lines: &[String]) -> Result<usize, ParsingError> {
    lines
        .iter()
        .position(|line| line.contains(HeaderLayout::END_OF_HEADER))
        .ok_or(ParsingError::MalformedHeader)
}

impl Header {
    /// Parses the [Header] section contained in these lines,
    /// which must describe the entire file.
    pub fn parse(lines: &[String]) -> Result<Self, ParsingError> {
        let end_of_header = end_of_header(lines)?;
        let section = &lines[..=end_of_header];

        let mut version = Option::<Version>::None;
        let mut rinex_type = ' ';
        let mut constellation = Option::<Constellation>::None;
        let mut timescale = Option::<TimeScale>::None;
        let mut marker_name = Option::<String>::None;
        let mut comments = Vec::<String>::new();

        let mut v2_observables = Vec::<&str>::new();
        let mut v3_observables = Vec::<&str>::new();

        for line in section {
            let content = fixed_field(line, 0, HeaderLayout::DATA_WIDTH);
            let marker = fixed_field(line, HeaderLayout::DATA_WIDTH, line.len());

            if marker.contains(HeaderLayout::VERSION_TYPE) {
                let vers = fixed_field(content, 0, HeaderLayout::VERSION_END);
                version = Some(
                    Version::from_str(vers).map_err(|_| ParsingError::VersionParsing)?,
                );
                rinex_type = fixed_field(content, HeaderLayout::TYPE_OFFSET, content.len())
                    .chars()
                    .next()
                    .unwrap_or(' ');

                let system = fixed_field(
                    content,
                    HeaderLayout::SYSTEM_OFFSET,
                    HeaderLayout::SYSTEM_OFFSET + 1,
                );
                constellation = Constellation::from_str(system).ok();
            } else if marker.contains(HeaderLayout::TIME_OF_FIRST_OBS) {
                timescale = timescale_from_system(fixed_field(
                    content,
                    HeaderLayout::TIME_SYSTEM_START,
                    HeaderLayout::TIME_SYSTEM_END,
                ));
            } else if marker.contains("MARKER NAME") {
                let name = content.trim();
                if !name.is_empty() {
                    marker_name = Some(name.to_string());
                }
            } else if marker.contains("COMMENT") {
                comments.push(content.trim_end().to_string());
            }

            if line.contains(HeaderLayout::V2_OBS_TYPES) {
                v2_observables.push(line);
            } else if line.contains(HeaderLayout::V3_OBS_TYPES) {
                v3_observables.push(line);
            }
        }

        let version = version.ok_or(ParsingError::VersionParsing)?;

        if !version.is_supported() {
            return Err(ParsingError::UnsupportedVersion(version));
        }

        if rinex_type != 'O' {
            return Err(ParsingError::NotObservationRinex(rinex_type));
        }

        let catalog = if version.is_modern() {
            ObservableCatalog::from_v3_lines(&v3_observables)?
        } else {
            ObservableCatalog::from_v2_lines(&v2_observables)?
        };

        // GPS time, unless stated otherwise
        let timescale = timescale.unwrap_or(TimeScale::GPST);

        debug!(
            "RINEX v{} type '{}' {:?} ({}): {:?}",
            version, rinex_type, constellation, timescale, catalog
        );

        Ok(Self {
            version,
            rinex_type,
            constellation,
            timescale,
            marker_name,
            comments,
            end_of_header,
            catalog,
        })
    }
}
