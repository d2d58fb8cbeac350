//! IRIs of the vocabularies the filter core understands
//!
//! Datatype IRIs are used by the term classifiers, function IRIs by the
//! serializer when it renders function-style expressions.

/// XML Schema datatypes
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    pub const NON_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonPositiveInteger";
    pub const NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#negativeInteger";
    pub const UNSIGNED_LONG: &str = "http://www.w3.org/2001/XMLSchema#unsignedLong";
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";
    pub const UNSIGNED_SHORT: &str = "http://www.w3.org/2001/XMLSchema#unsignedShort";
    pub const UNSIGNED_BYTE: &str = "http://www.w3.org/2001/XMLSchema#unsignedByte";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// RDF syntax vocabulary
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    pub const DIR_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#dirLangString";
}

/// GeoSPARQL ontology (literal datatypes)
pub mod geo {
    pub const NAMESPACE: &str = "http://www.opengis.net/ont/geosparql#";

    pub const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
    pub const GML_LITERAL: &str = "http://www.opengis.net/ont/geosparql#gmlLiteral";
}

/// GeoSPARQL function namespace
pub mod geof {
    pub const NAMESPACE: &str = "http://www.opengis.net/def/function/geosparql/";
}

/// XPath functions used by the string operators
pub mod xpath {
    pub const NAMESPACE: &str = "http://www.w3.org/2005/xpath-functions#";
}

/// SPARQL 1.2 function namespace
pub mod sparql {
    pub const NAMESPACE: &str = "http://www.w3.org/ns/sparql#";
}

/// Coordinate reference systems
pub mod crs {
    /// Default CRS of WKT literals (longitude, latitude on WGS84)
    pub const CRS84: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";
    /// WGS84 World Cylindrical Equal Area
    pub const EPSG_6933: &str = "http://www.opengis.net/def/crs/EPSG/0/6933";
}
