use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, Event};
use retropom_core::Coordinates;

use crate::{Element, PomError};

const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const POM_SCHEMA_LOCATION: &str =
    "http://maven.apache.org/POM/4.0.0 http://maven.apache.org/maven-v4_0_0.xsd";

/// Base `<project>` tree for the given coordinates, without licenses
#[must_use]
pub fn project_element(coordinates: &Coordinates) -> Element {
    let mut project = Element::new("project")
        .attr("xmlns", POM_NAMESPACE)
        .attr("xmlns:xsi", XSI_NAMESPACE)
        .attr("xsi:schemaLocation", POM_SCHEMA_LOCATION)
        .child(Element::with_text("modelVersion", "4.0.0"))
        .child(Element::with_text("groupId", &coordinates.group_id))
        .child(Element::with_text("artifactId", &coordinates.artifact_id))
        .child(Element::with_text("version", &coordinates.version))
        .child(Element::with_text("name", &coordinates.artifact_id));
    if let Some(description) = &coordinates.description {
        project.push(Element::with_text("description", description));
    }
    if let Some(url) = &coordinates.url {
        project.push(Element::with_text("url", url));
    }
    project
}

/// Serialize the base descriptor for `coordinates`, four-space indented with an XML declaration
pub fn generate_pom(coordinates: &Coordinates) -> Result<String, PomError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(PomError::serialize)?;
    project_element(coordinates).write_to(&mut writer)?;

    let mut result =
        String::from_utf8(writer.into_inner().into_inner()).map_err(PomError::serialize)?;
    result.push('\n');
    Ok(result)
}
