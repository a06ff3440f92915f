//! Built-in registrations
//!
//! Static tables applied once when the registries are first created.

use xmpcore_types::ns;

use crate::errors::Result;
use crate::options::raw::{ARRAY_IS_ALT_TEXT, ARRAY_IS_ORDERED};

use super::{AliasRegistry, NamespaceRegistry};

/// `(uri, prefix)` for every namespace registered at startup, in
/// registration order
pub const STANDARD_NAMESPACES: &[(&str, &str)] = &[
    (ns::XML, "xml"),
    (ns::RDF, "rdf"),
    (ns::DC, "dc"),
    (ns::XMP, "xmp"),
    (ns::PDF, "pdf"),
    (ns::PHOTOSHOP, "photoshop"),
    (ns::PS_ALBUM, "album"),
    (ns::EXIF, "exif"),
    (ns::EXIF_AUX, "aux"),
    (ns::EXIF_EX, "exifEX"),
    (ns::TIFF, "tiff"),
    (ns::PNG, "png"),
    (ns::JPEG, "jpeg"),
    (ns::JP2K, "jp2k"),
    (ns::CAMERA_RAW, "crs"),
    (ns::ASF, "asf"),
    (ns::WAV, "wav"),
    (ns::ADOBE_STOCK_PHOTO, "bmsp"),
    (ns::CREATOR_ATOM, "creatorAtom"),
    (ns::XMP_RIGHTS, "xmpRights"),
    (ns::XMP_MM, "xmpMM"),
    (ns::XMP_BJ, "xmpBJ"),
    (ns::XMP_NOTE, "xmpNote"),
    (ns::DYNAMIC_MEDIA, "xmpDM"),
    (ns::SCRIPT, "xmpScript"),
    (ns::BWF, "bext"),
    (ns::AES_CART, "AEScart"),
    (ns::RIFF_INFO, "riffinfo"),
    (ns::XMP_TEXT, "xmpT"),
    (ns::XMP_PAGED_FILE, "xmpTPg"),
    (ns::XMP_GRAPHICS, "xmpG"),
    (ns::XMP_IMAGE, "xmpGImg"),
    (ns::ST_FONT, "stFnt"),
    (ns::ST_DIMENSIONS, "stDim"),
    (ns::ST_RESOURCE_EVENT, "stEvt"),
    (ns::ST_RESOURCE_REF, "stRef"),
    (ns::ST_VERSION, "stVer"),
    (ns::ST_JOB, "stJob"),
    (ns::ST_MANIFEST_ITEM, "stMfs"),
    (ns::IDENTIFIER_QUAL, "xmpidq"),
    (ns::IPTC_CORE, "Iptc4xmpCore"),
    (ns::IPTC_EXT, "Iptc4xmpExt"),
    (ns::DICOM, "DICOM"),
    (ns::PLUS, "plus"),
    (ns::PDFA_SCHEMA, "pdfaSchema"),
    (ns::PDFA_PROPERTY, "pdfaProperty"),
    (ns::PDFA_TYPE, "pdfaType"),
    (ns::PDFA_FIELD, "pdfaField"),
    (ns::PDFA_ID, "pdfaid"),
    (ns::PDFA_EXTENSION, "pdfaExtension"),
    (ns::PDFX, "pdfx"),
    (ns::PDFX_ID, "pdfxid"),
    (ns::ADOBE_META, "x"),
    (ns::IX, "iX"),
    (ns::IXML, "iXML"),
    (ns::MICROSOFT_PHOTO, "MicrosoftPhoto"),
];

/// One built-in alias: `(alias ns, alias prop, actual ns, actual prop, array form)`
pub type AliasSpec = (&'static str, &'static str, &'static str, &'static str, u32);

pub const STANDARD_ALIASES: &[AliasSpec] = &[
    // xmp:
    (ns::XMP, "Author", ns::DC, "creator", ARRAY_IS_ORDERED),
    (ns::XMP, "Authors", ns::DC, "creator", 0),
    (ns::XMP, "Description", ns::DC, "description", 0),
    (ns::XMP, "Format", ns::DC, "format", 0),
    (ns::XMP, "Keywords", ns::DC, "subject", 0),
    (ns::XMP, "Locale", ns::DC, "language", 0),
    (ns::XMP, "Title", ns::DC, "title", 0),
    (ns::XMP_RIGHTS, "Copyright", ns::DC, "rights", 0),
    // pdf:
    (ns::PDF, "Author", ns::DC, "creator", ARRAY_IS_ORDERED),
    (ns::PDF, "BaseURL", ns::XMP, "BaseURL", 0),
    (ns::PDF, "CreationDate", ns::XMP, "CreateDate", 0),
    (ns::PDF, "Creator", ns::XMP, "CreatorTool", 0),
    (ns::PDF, "ModDate", ns::XMP, "ModifyDate", 0),
    (ns::PDF, "Subject", ns::DC, "description", ARRAY_IS_ALT_TEXT),
    (ns::PDF, "Title", ns::DC, "title", ARRAY_IS_ALT_TEXT),
    // photoshop:
    (ns::PHOTOSHOP, "Author", ns::DC, "creator", ARRAY_IS_ORDERED),
    (ns::PHOTOSHOP, "Caption", ns::DC, "description", ARRAY_IS_ALT_TEXT),
    (ns::PHOTOSHOP, "Copyright", ns::DC, "rights", ARRAY_IS_ALT_TEXT),
    (ns::PHOTOSHOP, "Keywords", ns::DC, "subject", 0),
    (ns::PHOTOSHOP, "Marked", ns::XMP_RIGHTS, "Marked", 0),
    (ns::PHOTOSHOP, "Title", ns::DC, "title", ARRAY_IS_ALT_TEXT),
    (ns::PHOTOSHOP, "WebStatement", ns::XMP_RIGHTS, "WebStatement", 0),
    // tiff: and exif:
    (ns::TIFF, "Artist", ns::DC, "creator", ARRAY_IS_ORDERED),
    (ns::TIFF, "Copyright", ns::DC, "rights", 0),
    (ns::TIFF, "DateTime", ns::XMP, "ModifyDate", 0),
    (ns::TIFF, "ImageDescription", ns::DC, "description", ARRAY_IS_ALT_TEXT),
    (ns::TIFF, "Software", ns::XMP, "CreatorTool", 0),
    (ns::EXIF, "DateTimeDigitized", ns::XMP, "CreateDate", 0),
    // png:
    (ns::PNG, "Author", ns::DC, "creator", ARRAY_IS_ORDERED),
    (ns::PNG, "Copyright", ns::DC, "rights", ARRAY_IS_ALT_TEXT),
    (ns::PNG, "CreationTime", ns::XMP, "CreateDate", 0),
    (ns::PNG, "Description", ns::DC, "description", ARRAY_IS_ALT_TEXT),
    (ns::PNG, "ModificationTime", ns::XMP, "ModifyDate", 0),
    (ns::PNG, "Software", ns::XMP, "CreatorTool", 0),
    (ns::PNG, "Title", ns::DC, "title", ARRAY_IS_ALT_TEXT),
];

/// Register every standard namespace
///
/// # Errors
/// Propagates a registration failure, which indicates a bad table entry
pub fn register_standard_namespaces(namespaces: &mut NamespaceRegistry) -> Result<()> {
    for (uri, prefix) in STANDARD_NAMESPACES {
        namespaces.define(uri, prefix)?;
    }
    Ok(())
}

/// Register every standard alias
///
/// # Errors
/// Propagates a registration failure, which indicates a bad table entry
pub fn register_standard_aliases(
    namespaces: &NamespaceRegistry,
    aliases: &mut AliasRegistry,
) -> Result<()> {
    for &(alias_ns, alias_prop, actual_ns, actual_prop, form) in STANDARD_ALIASES {
        aliases.register(namespaces, alias_ns, alias_prop, actual_ns, actual_prop, form)?;
    }
    Ok(())
}
