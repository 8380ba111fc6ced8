use serde::{ser::SerializeMap, Serialize};

use crate::metadata::Metadata;

impl Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::metadata::Metadata;

    #[test]
    fn serialize_in_file_order() -> serde_json::Result<()> {
        let metadata = Metadata::parse("version=2.4.2\nwordcount=1\nbookname=Test\nversion=3.0.0\n");
        assert_eq!(
            serde_json::to_string(&metadata)?,
            r#"{"version":"3.0.0","wordcount":"1","bookname":"Test"}"#
        );
        Ok(())
    }
}
