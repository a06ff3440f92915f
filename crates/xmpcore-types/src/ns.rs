//! Well-known namespace URIs
//!
//! The URIs registered by the library at initialisation, together with the
//! prefix each one is registered under (see `xmpcore::registry::standard`).

pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const DC: &str = "http://purl.org/dc/elements/1.1/";

pub const XMP: &str = "http://ns.adobe.com/xap/1.0/";
pub const PDF: &str = "http://ns.adobe.com/pdf/1.3/";
pub const PHOTOSHOP: &str = "http://ns.adobe.com/photoshop/1.0/";
pub const PS_ALBUM: &str = "http://ns.adobe.com/album/1.0/";
pub const EXIF: &str = "http://ns.adobe.com/exif/1.0/";
pub const EXIF_AUX: &str = "http://ns.adobe.com/exif/1.0/aux/";
pub const EXIF_EX: &str = "http://cipa.jp/exif/1.0/";
pub const TIFF: &str = "http://ns.adobe.com/tiff/1.0/";
pub const PNG: &str = "http://ns.adobe.com/png/1.0/";
pub const JPEG: &str = "http://ns.adobe.com/jpeg/1.0/";
pub const JP2K: &str = "http://ns.adobe.com/jp2k/1.0/";
pub const CAMERA_RAW: &str = "http://ns.adobe.com/camera-raw-settings/1.0/";
pub const ASF: &str = "http://ns.adobe.com/asf/1.0/";
pub const WAV: &str = "http://ns.adobe.com/xmp/wav/1.0/";

pub const ADOBE_STOCK_PHOTO: &str = "http://ns.adobe.com/StockPhoto/1.0/";
pub const CREATOR_ATOM: &str = "http://ns.adobe.com/creatorAtom/1.0/";

pub const XMP_RIGHTS: &str = "http://ns.adobe.com/xap/1.0/rights/";
pub const XMP_MM: &str = "http://ns.adobe.com/xap/1.0/mm/";
pub const XMP_BJ: &str = "http://ns.adobe.com/xap/1.0/bj/";
pub const XMP_NOTE: &str = "http://ns.adobe.com/xmp/note/";

pub const DYNAMIC_MEDIA: &str = "http://ns.adobe.com/xmp/1.0/DynamicMedia/";
pub const SCRIPT: &str = "http://ns.adobe.com/xmp/1.0/Script/";
pub const BWF: &str = "http://ns.adobe.com/bwf/bext/1.0/";
pub const AES_CART: &str = "http://ns.adobe.com/aes/cart/";
pub const RIFF_INFO: &str = "http://ns.adobe.com/riff/info/";
pub const XMP_TEXT: &str = "http://ns.adobe.com/xap/1.0/t/";
pub const XMP_PAGED_FILE: &str = "http://ns.adobe.com/xap/1.0/t/pg/";
pub const XMP_GRAPHICS: &str = "http://ns.adobe.com/xap/1.0/g/";
pub const XMP_IMAGE: &str = "http://ns.adobe.com/xap/1.0/g/img/";

pub const ST_FONT: &str = "http://ns.adobe.com/xap/1.0/sType/Font#";
pub const ST_DIMENSIONS: &str = "http://ns.adobe.com/xap/1.0/sType/Dimensions#";
pub const ST_RESOURCE_EVENT: &str = "http://ns.adobe.com/xap/1.0/sType/ResourceEvent#";
pub const ST_RESOURCE_REF: &str = "http://ns.adobe.com/xap/1.0/sType/ResourceRef#";
pub const ST_VERSION: &str = "http://ns.adobe.com/xap/1.0/sType/Version#";
pub const ST_JOB: &str = "http://ns.adobe.com/xap/1.0/sType/Job#";
pub const ST_MANIFEST_ITEM: &str = "http://ns.adobe.com/xap/1.0/sType/ManifestItem#";

pub const IDENTIFIER_QUAL: &str = "http://ns.adobe.com/xmp/Identifier/qual/1.0/";

pub const IPTC_CORE: &str = "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/";
pub const IPTC_EXT: &str = "http://iptc.org/std/Iptc4xmpExt/2008-02-29/";
pub const DICOM: &str = "http://ns.adobe.com/DICOM/";
pub const PLUS: &str = "http://ns.useplus.org/ldf/xmp/1.0/";

pub const PDFA_SCHEMA: &str = "http://www.aiim.org/pdfa/ns/schema#";
pub const PDFA_PROPERTY: &str = "http://www.aiim.org/pdfa/ns/property#";
pub const PDFA_TYPE: &str = "http://www.aiim.org/pdfa/ns/type#";
pub const PDFA_FIELD: &str = "http://www.aiim.org/pdfa/ns/field#";
pub const PDFA_ID: &str = "http://www.aiim.org/pdfa/ns/id/";
pub const PDFA_EXTENSION: &str = "http://www.aiim.org/pdfa/ns/extension/";

pub const PDFX: &str = "http://ns.adobe.com/pdfx/1.3/";
pub const PDFX_ID: &str = "http://www.npes.org/pdfx/ns/id/";

pub const ADOBE_META: &str = "adobe:ns:meta/";
pub const IX: &str = "http://ns.adobe.com/iX/1.0/";
pub const IXML: &str = "http://ns.adobe.com/ixml/1.0/";
pub const MICROSOFT_PHOTO: &str = "http://ns.microsoft.com/photo/1.0/";
