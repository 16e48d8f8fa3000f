mod atom;
mod rss;

pub use atom::parse_atom_feed;
pub use rss::parse_rss_feed;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::models::{FeedEntry, FeedFormat};
use crate::FeedError;

/// Detect the syndication format from the document root element
pub fn detect_format(xml: &[u8]) -> Result<FeedFormat, FeedError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                return match name.as_str() {
                    "rss" | "rdf:RDF" => Ok(FeedFormat::Rss),
                    "feed" => Ok(FeedFormat::Atom),
                    other => Err(FeedError::Parse(format!(
                        "Unrecognized feed root element: <{}>",
                        other
                    ))),
                };
            }
            Ok(Event::Eof) => {
                return Err(FeedError::Parse("Empty feed document".to_string()))
            }
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse a feed from raw XML bytes, dispatching on the detected format
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    match detect_format(xml)? {
        FeedFormat::Rss => parse_rss_feed(xml),
        FeedFormat::Atom => parse_atom_feed(xml),
    }
}
