//! Observation records decoding
use crate::{constants::ObsLayout, fixed_field, table::Signal};

pub mod v2;
pub mod v3;

/// Decodes the (value, LLI, SSI) field starting at this offset.
/// Blank, unreadable or non finite values are missing.
pub(crate) fn decode_signal(record: &str, offset: usize) -> Signal {
    let value_end = offset + ObsLayout::VALUE_WIDTH;
    let lli_end = value_end + ObsLayout::LLI_WIDTH;
    let ssi_end = lli_end + ObsLayout::SSI_WIDTH;

    let value = fixed_field(record, offset, value_end)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite());

    Signal {
        value,
        lli: indicator(fixed_field(record, value_end, lli_end)),
        ssi: indicator(fixed_field(record, lli_end, ssi_end)),
    }
}

fn indicator(field: &str) -> Option<char> {
    field.chars().next().filter(|c| !c.is_whitespace())
}

/// Normalizes a 3 character satellite token to `XNN`.
/// A blank system letter takes this default system.
pub(crate) fn normalize_prn(token: &str, default_system: char) -> String {
    let mut chars = token.chars();
    let system = match chars.next() {
        Some(c) if !c.is_whitespace() => c.to_ascii_uppercase(),
        _ => default_system,
    };
    let number = chars.as_str().trim();
    match number.parse::<u8>() {
        Ok(prn) => format!("{}{:02}", system, prn),
        Err(_) => format!("{}{}", system, number),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signal_decoding() {
        let record = "  23629347.915 8         -.353 4                  24150139.2347";
        let signal = decode_signal(record, 0);
        assert_eq!(signal.value, Some(23629347.915));
        assert_eq!(signal.lli, None);
        assert_eq!(signal.ssi, Some('8'));

        let signal = decode_signal(record, 16);
        assert_eq!(signal.value, Some(-0.353));
        assert_eq!(signal.lli, None);
        assert_eq!(signal.ssi, Some('4'));

        // blank field
        assert!(decode_signal(record, 32).is_missing());

        let signal = decode_signal(record, 48);
        assert_eq!(signal.value, Some(24150139.234));
        assert_eq!(signal.lli, Some('7'));
        assert_eq!(signal.ssi, None);

        // past the end of line
        assert!(decode_signal(record, 64).is_missing());
    }

    #[test]
    fn unreadable_value() {
        let signal = decode_signal("    ********** 1", 0);
        assert_eq!(signal.value, None);
        assert_eq!(signal.ssi, Some('1'));

        // non finite values are missing too
        for field in ["           NaN 1", "           inf 1", "     -infinity 1"] {
            let signal = decode_signal(field, 0);
            assert_eq!(signal.value, None, "{}", field);
            assert_eq!(signal.ssi, Some('1'));
            let copy = signal;
            assert_eq!(signal, copy);
        }
    }

    #[test]
    fn prn_normalization() {
        assert_eq!(normalize_prn("G01", 'G'), "G01");
        assert_eq!(normalize_prn("R 7", 'G'), "R07");
        assert_eq!(normalize_prn(" 12", 'R'), "R12");
        assert_eq!(normalize_prn("  5", 'G'), "G05");
        assert_eq!(normalize_prn("e11", 'G'), "E11");
    }
}
