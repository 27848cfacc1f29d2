#[cfg(test)]
mod test {
    use crate::{
        epoch::index::epoch_index,
        prelude::{EpochFlag, Header},
        tests::toolkit::{gpst, test_resource},
    };

    fn lines(revision: &str, filename: &str) -> Vec<String> {
        let content = std::fs::read_to_string(test_resource(revision, filename)).unwrap();
        content.lines().map(|line| line.to_string()).collect()
    }

    #[test]
    fn v2_epoch_index() {
        let lines = lines("V2", "ajac0010.21o");
        let header = Header::parse(&lines).unwrap();
        assert_eq!(header.end_of_header, 10);
        assert_eq!(header.marker_name.as_deref(), Some("AJAC"));

        let index = epoch_index(&lines, &header).unwrap();
        assert_eq!(index.len(), 5);

        let epochs = index.iter().map(|entry| entry.epoch).collect::<Vec<_>>();
        assert_eq!(
            epochs,
            vec![
                gpst(2021, 1, 1, 0, 0, 0),
                gpst(2021, 1, 1, 0, 0, 15),
                gpst(2021, 1, 1, 0, 0, 15),
                gpst(2021, 1, 1, 0, 0, 30),
                gpst(2021, 1, 1, 0, 1, 0),
            ]
        );

        let flags = index.iter().map(|entry| entry.flag).collect::<Vec<_>>();
        assert_eq!(
            flags,
            vec![
                EpochFlag::Ok,
                EpochFlag::HeaderInformationFollows,
                EpochFlag::ExternalEvent,
                EpochFlag::Ok,
                EpochFlag::PowerFailure,
            ]
        );

        assert_eq!(index[0].offset, 11);
        assert_eq!(index[0].num_sat, 13);
        // 2 satellite lines, 13 records of 2 lines
        assert_eq!(index[1].offset, 11 + 2 + 26);
        // 2 special records
        assert_eq!(index[2].offset, index[1].offset + 3);
        assert_eq!(index[3].offset, index[2].offset + 1);
        assert_eq!(index[4].offset, index[3].offset + 1 + 3 * 2);

        for pair in index.windows(2) {
            assert!(pair[0].offset < pair[1].offset);
        }
    }

    #[test]
    fn v3_epoch_index() {
        let lines = lines("V3", "ACOR00ESP.rnx");
        let header = Header::parse(&lines).unwrap();
        assert_eq!(header.end_of_header, 11);

        let index = epoch_index(&lines, &header).unwrap();
        assert_eq!(index.len(), 4);

        let offsets = index.iter().map(|entry| entry.offset).collect::<Vec<_>>();
        assert_eq!(offsets, vec![12, 18, 20, 24]);

        assert_eq!(index[1].flag, EpochFlag::HeaderInformationFollows);
        assert_eq!(index[1].num_sat, 1);
        assert_eq!(index[3].epoch, gpst(2022, 3, 4, 0, 1, 0));
        assert_eq!(index[3].num_sat, 2);
    }
}
