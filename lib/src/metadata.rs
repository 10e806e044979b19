use crate::Version;
use crate::metadata::MetadataError::Unexpected;
use serde::Serialize;
use std::io::{BufReader, Cursor, Read};
use thiserror::Error;
use xml::EventReader;
use xml::reader::XmlEvent;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{0} IO error while parsing")]
    IO(#[from] std::io::Error),
    #[error("{0} XML error while parsing")]
    XML(#[from] xml::reader::Error),
    #[error("{0} Unexpected XML error while parsing")]
    Unexpected(String),
}

/// The `versioning` block of one `maven-metadata.xml`.
///
/// `versions` preserves repository declaration order; reordering is the
/// caller's concern. Artifact-level documents carry the version list and the
/// `latest`/`release` pointers, version-scoped snapshot documents carry the
/// `snapshot` block.
#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct Versioning {
    pub latest: Option<Version>,
    pub release: Option<Version>,
    pub versions: Vec<Version>,
    pub last_updated: Option<String>,
    pub snapshot: Option<Snapshot>,
}

/// Pointer to the immutable timestamped build backing a SNAPSHOT version.
///
/// `build_number` stays a string: it is only ever spliced back into a
/// version label, and reformatting would lose leading zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub build_number: String,
}

impl Versioning {
    pub fn from_str(input: &str) -> Result<Versioning, MetadataError> {
        Self::parse(Cursor::new(input))
    }

    pub fn parse<R: Read>(input: R) -> Result<Versioning, MetadataError> {
        let buffer = BufReader::new(input);
        let mut parser = EventReader::new(buffer);
        let mut versioning: Option<Versioning> = None;

        loop {
            let event = &parser.next()?;
            match event {
                XmlEvent::EndDocument => match versioning {
                    Some(v) => break Ok(v),
                    None => break Err(Unexpected(String::from("Missing versioning"))),
                },
                XmlEvent::StartElement { name, .. } if name.local_name == "versioning" => {
                    let v = Self::parse_versioning(&mut parser)?;
                    versioning = Some(v);
                }
                _ => continue,
            }
        }
    }

    fn parse_versioning<R: Read>(
        parser: &mut EventReader<BufReader<R>>,
    ) -> Result<Versioning, MetadataError> {
        let mut parsed = Versioning::default();
        loop {
            let event = &parser.next()?;
            match event {
                XmlEvent::EndElement { name, .. } if name.local_name == "versioning" => {
                    break Ok(parsed);
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "latest" => {
                    let version = Self::string_element(parser)?;
                    parsed.latest = Some(Version::from(version));
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "release" => {
                    let version = Self::string_element(parser)?;
                    parsed.release = Some(Version::from(version));
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "version" => {
                    let version = Self::string_element(parser)?;
                    parsed.versions.push(Version::from(version));
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "lastUpdated" => {
                    let updated = Self::string_element(parser)?;
                    parsed.last_updated = Some(updated);
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "snapshot" => {
                    let snapshot = Self::parse_snapshot(parser)?;
                    parsed.snapshot = Some(snapshot);
                }
                _ => continue,
            }
        }
    }

    fn parse_snapshot<R: Read>(
        parser: &mut EventReader<BufReader<R>>,
    ) -> Result<Snapshot, MetadataError> {
        let mut timestamp: Option<String> = None;
        let mut build_number: Option<String> = None;
        loop {
            match parser.next()? {
                XmlEvent::EndElement { name, .. } if name.local_name == "snapshot" => {
                    let result = match (timestamp, build_number) {
                        (Some(t), Some(b)) => Ok(Snapshot {
                            timestamp: t,
                            build_number: b,
                        }),
                        (None, _) => Err(Unexpected(String::from("Timestamp is missing"))),
                        (_, None) => Err(Unexpected(String::from("buildNumber is missing"))),
                    };
                    break result;
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "timestamp" => {
                    let value = Self::string_element(parser)?;
                    timestamp = Some(value);
                }
                XmlEvent::StartElement { name, .. } if name.local_name == "buildNumber" => {
                    let value = Self::string_element(parser)?;
                    build_number = Some(value);
                }
                _ => continue,
            }
        }
    }

    fn string_element<R: Read>(
        parser: &mut EventReader<BufReader<R>>,
    ) -> Result<String, MetadataError> {
        let out = match &parser.next()? {
            XmlEvent::Characters(chars) => Ok(chars.to_owned()),
            e => Err(Unexpected(format!("{:?}", e))),
        }?;
        parser.next()?;
        Ok(out)
    }
}
