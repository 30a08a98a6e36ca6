//! `CompleteMultipartUpload` manifest serialization.

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::TransferError;

/// Namespace required on the manifest root element.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Content type of the completion request.
pub const MANIFEST_CONTENT_TYPE: &str = "application/xml";

/// A part acknowledged by the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    pub part_number: i32,
    /// Quoted ETag, as produced by [`normalize_etag`](crate::normalize_etag).
    pub e_tag: String,
}

/// Serializes completed parts into the completion manifest.
///
/// Parts are sorted by part number here regardless of the order they
/// arrive in; the object store rejects out-of-order manifests.
pub fn build_manifest(parts: &[CompletedPart]) -> Result<Vec<u8>, TransferError> {
    let mut sorted: Vec<&CompletedPart> = parts.iter().collect();
    sorted.sort_by_key(|p| p.part_number);

    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    writer.get_mut().push(b'\n');

    write(
        &mut writer,
        Event::Start(
            BytesStart::new("CompleteMultipartUpload").with_attributes([("xmlns", S3_NAMESPACE)]),
        ),
    )?;
    for part in sorted {
        let number = part.part_number.to_string();
        write(&mut writer, Event::Start(BytesStart::new("Part")))?;
        write_text_element(&mut writer, "PartNumber", &number)?;
        write_text_element(&mut writer, "ETag", &part.e_tag)?;
        write(&mut writer, Event::End(BytesEnd::new("Part")))?;
    }
    write(
        &mut writer,
        Event::End(BytesEnd::new("CompleteMultipartUpload")),
    )?;

    Ok(writer.into_inner())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), TransferError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    // Quotes in ETags stay literal; only markup characters are escaped.
    write(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), TransferError> {
    writer
        .write_event(event)
        .map_err(|e| TransferError::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(n: i32, etag: &str) -> CompletedPart {
        CompletedPart {
            part_number: n,
            e_tag: etag.into(),
        }
    }

    #[test]
    fn manifest_exact_wire_format() {
        let xml = build_manifest(&[part(1, "\"abc123\"")]).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <CompleteMultipartUpload xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <Part><PartNumber>1</PartNumber><ETag>\"abc123\"</ETag></Part>\
             </CompleteMultipartUpload>"
        );
    }

    #[test]
    fn manifest_sorts_out_of_order_parts() {
        let xml = build_manifest(&[part(3, "\"c\""), part(1, "\"a\""), part(2, "\"b\"")]).unwrap();
        let xml = String::from_utf8(xml).unwrap();

        let p1 = xml.find("<PartNumber>1</PartNumber>").unwrap();
        let p2 = xml.find("<PartNumber>2</PartNumber>").unwrap();
        let p3 = xml.find("<PartNumber>3</PartNumber>").unwrap();
        assert!(p1 < p2 && p2 < p3);
        assert!(xml.find("\"a\"").unwrap() < xml.find("\"c\"").unwrap());
    }

    #[test]
    fn manifest_escapes_markup_in_etag() {
        let xml = build_manifest(&[part(1, "\"a<b&c\"")]).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains("<ETag>\"a&lt;b&amp;c\"</ETag>"));
    }

    #[test]
    fn empty_manifest_has_root_only() {
        let xml = String::from_utf8(build_manifest(&[]).unwrap()).unwrap();
        assert!(xml.ends_with(
            "<CompleteMultipartUpload xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"></CompleteMultipartUpload>"
        ));
    }
}
