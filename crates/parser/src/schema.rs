//! Conversion of OpenAPI schema nodes into the IR [`Schema`] tree

use crate::openapi::{ref_name, OpenApiSpec, ReferenceOr, Schema as RawSchema};
use openapi_operator_gen_common::{Schema, Value};

/// Convert a (possibly referenced) schema node
///
/// A top-level `$ref` is dereferenced and the result carries the component
/// name in `ref_name`. Returns `None` when the reference cannot be resolved.
pub fn convert_schema(
    spec: &OpenApiSpec,
    name: &str,
    schema: &ReferenceOr<RawSchema>,
) -> Option<Schema> {
    SchemaConverter::new(spec).convert(name, schema)
}

/// Recursive converter tracking the components currently being expanded
struct SchemaConverter<'a> {
    spec: &'a OpenApiSpec,
    visiting: Vec<String>,
}

impl<'a> SchemaConverter<'a> {
    fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            spec,
            visiting: Vec::new(),
        }
    }

    fn convert(&mut self, name: &str, schema: &ReferenceOr<RawSchema>) -> Option<Schema> {
        match schema {
            ReferenceOr::Item(raw) => Some(self.convert_raw(name, raw)),
            ReferenceOr::Reference { reference } => self.expand_reference(name, reference),
        }
    }

    /// Dereference and convert, carrying only the name on cycles
    fn expand_reference(&mut self, name: &str, reference: &str) -> Option<Schema> {
        let target = self.spec.resolve_schema_ref(reference)?;
        let component = ref_name(reference);

        if self.visiting.contains(&component) {
            return Some(reference_node(name, &component, target));
        }

        self.visiting.push(component.clone());
        let mut converted = self.convert_raw(name, target);
        self.visiting.pop();

        converted.ref_name = Some(component);
        Some(converted)
    }

    fn convert_raw(&mut self, name: &str, raw: &RawSchema) -> Schema {
        // `allOf: [X]` wrappers add nothing but a description or nullability
        if let Some(member) = single_all_of(raw) {
            if let Some(mut converted) = self.convert(name, member) {
                if raw.description.is_some() {
                    converted.description = raw.description.clone();
                }
                converted.nullable |= raw.nullable;
                return converted;
            }
        }

        let mut schema = Schema {
            name: name.to_string(),
            schema_type: declared_type(raw),
            format: raw.format.clone(),
            description: raw.description.clone(),
            required: raw.required.clone(),
            nullable: raw.nullable || raw.schema_type.contains("null"),
            pattern: raw.pattern.clone(),
            min_length: raw.min_length,
            max_length: raw.max_length,
            minimum: raw.minimum,
            maximum: raw.maximum,
            min_items: raw.min_items,
            max_items: raw.max_items,
            enum_values: raw.enum_values.iter().map(Value::from).collect(),
            default: raw.default.as_ref().map(Value::from),
            ..Default::default()
        };

        for (prop_name, prop) in &raw.properties {
            if let Some(converted) = self.convert_property(prop_name, prop) {
                schema.properties.insert(prop_name.clone(), converted);
            }
        }

        if let Some(items) = &raw.items {
            schema.items = self.convert("Items", items).map(Box::new);
        }

        schema
    }

    /// Properties keep `$ref`s by name instead of inlining the component
    fn convert_property(&mut self, name: &str, prop: &ReferenceOr<RawSchema>) -> Option<Schema> {
        let reference = match prop {
            ReferenceOr::Reference { reference } => Some(reference.as_str()),
            ReferenceOr::Item(raw) => single_all_of(raw).and_then(|m| m.as_reference()),
        };

        match reference {
            Some(reference) => {
                let mut node = match self.spec.resolve_schema_ref(reference) {
                    Some(target) => reference_node(name, &ref_name(reference), target),
                    None => Schema {
                        name: name.to_string(),
                        ref_name: Some(ref_name(reference)),
                        ..Default::default()
                    },
                };

                // Sibling keys of an allOf wrapper
                if let ReferenceOr::Item(raw) = prop {
                    if raw.description.is_some() {
                        node.description = raw.description.clone();
                    }
                    node.nullable |= raw.nullable;
                }
                Some(node)
            }
            None => self.convert(name, prop),
        }
    }
}

/// Node standing in for a referenced component without its properties
fn reference_node(name: &str, component: &str, target: &RawSchema) -> Schema {
    Schema {
        name: name.to_string(),
        schema_type: declared_type(target),
        format: target.format.clone(),
        description: target.description.clone(),
        nullable: target.nullable,
        ref_name: Some(component.to_string()),
        ..Default::default()
    }
}

/// Declared type, or one inferred from the node's structure
fn declared_type(raw: &RawSchema) -> Option<String> {
    if let Some(primary) = raw.schema_type.primary() {
        return Some(primary.to_string());
    }

    if !raw.properties.is_empty() {
        Some("object".to_string())
    } else if raw.items.is_some() {
        Some("array".to_string())
    } else {
        None
    }
}

fn single_all_of(raw: &RawSchema) -> Option<&ReferenceOr<RawSchema>> {
    match raw.all_of.as_slice() {
        [member] if raw.schema_type.is_empty() && raw.properties.is_empty() => Some(member),
        _ => None,
    }
}
