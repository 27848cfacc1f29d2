#[cfg(test)]
mod test {
    use crate::{prelude::*, tests::toolkit::test_resource};

    #[test]
    fn gzip_v2() {
        let compressed = ObsReader::new()
            .read_gzip_file(test_resource("V2", "ajac0010.21o.gz"))
            .unwrap();
        let plain = ObsReader::new()
            .read_file(test_resource("V2", "ajac0010.21o"))
            .unwrap();
        assert_eq!(compressed, plain);
        assert_eq!(compressed.len(), 18);
    }

    #[test]
    fn gzip_on_plain_file() {
        assert!(matches!(
            ObsReader::new().read_gzip_file(test_resource("V2", "ajac0010.21o")),
            Err(Error::IoError(_))
        ));
    }
}
