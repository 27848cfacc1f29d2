#[cfg(test)]
mod test {
    use crate::{prelude::*, read_rinex3_obs, tests::toolkit::test_resource};

    #[test]
    fn table_serdes() {
        let table = read_rinex3_obs(test_resource("V3", "ACOR00ESP.rnx"), Some(&["epoch", "prn"]))
            .unwrap();

        let content = serde_json::to_string(&table).unwrap();
        let parsed: ObservationTable = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.index(), table.index());
        assert_eq!(parsed.columns(), table.columns());
        assert_eq!(parsed.len(), table.len());

        for (a, b) in parsed.iter().zip(table.iter()) {
            assert_eq!(a.epoch, b.epoch);
            assert_eq!(a.prn, b.prn);
            for (sa, sb) in a.signals.iter().zip(b.signals.iter()) {
                assert_eq!(sa.lli, sb.lli);
                assert_eq!(sa.ssi, sb.ssi);
                match (sa.value, sb.value) {
                    (Some(va), Some(vb)) => assert!((va - vb).abs() < 1e-6),
                    (None, None) => {},
                    _ => panic!("{}: value mismatch", a.prn),
                }
            }
        }
    }

    #[test]
    fn row_serialization() {
        let table = read_rinex3_obs(test_resource("V3", "ACOR00ESP.rnx"), None).unwrap();
        let row = serde_json::to_value(&table.rows()[2]).unwrap();
        assert_eq!(row["prn"], "R05");
        assert_eq!(row["sys"], "R");
        assert_eq!(row["signals"][0]["value"], 19897354.456);
        assert_eq!(row["signals"][0]["ssi"], "6");
        assert!(row["signals"][1]["value"].is_null());
    }
}
