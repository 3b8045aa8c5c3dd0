use crate::enrichment::geoip::{GeoInfo, GeoReader};
use maxminddb::PathElement;
use std::net::IpAddr;
use std::path::Path;

const LOCALE: &str = "en";

/// City database reader. Opened once at startup and read-only afterwards.
pub struct MaxMindReader {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl MaxMindReader {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let reader = maxminddb::Reader::open_readfile(path)?;
        Ok(Self { reader })
    }
}

impl GeoReader for MaxMindReader {
    fn locate(&self, ip: IpAddr) -> Option<GeoInfo> {
        let lookup = self.reader.lookup(ip).ok()?;

        let country = lookup
            .decode_path::<String>(&[PathElement::Key("country"), PathElement::Key("iso_code")])
            .ok()
            .flatten()
            .unwrap_or_default();

        let region = lookup
            .decode_path::<String>(&[
                PathElement::Key("subdivisions"),
                PathElement::Index(0),
                PathElement::Key("names"),
                PathElement::Key(LOCALE),
            ])
            .ok()
            .flatten()
            .unwrap_or_default();

        let city = lookup
            .decode_path::<String>(&[
                PathElement::Key("city"),
                PathElement::Key("names"),
                PathElement::Key(LOCALE),
            ])
            .ok()
            .flatten()
            .unwrap_or_default();

        Some(GeoInfo {
            country,
            region,
            city,
        })
    }
}
