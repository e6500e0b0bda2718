//! Walking entity schemas to collect nested object types

use crate::graph::NestedTypeGraph;
use crate::nested_types::{SchemaNestedTypes, Side, TypePath};
use std::collections::BTreeMap;
use tfgen_common::naming::singularize;
use tfgen_common::{
    DocKind, EntitySchema, FieldInfo, GeneratorError, Property, PropertyKind, PropertyType,
    ProviderInfo, Result,
};
use tracing::debug;

/// Field overrides keyed by Terraform field name
type Overrides = BTreeMap<String, FieldInfo>;

/// State shared by one side of one entity
struct Walk<'a> {
    declarer: &'a str,
    side: Side,
}

impl SchemaNestedTypes {
    /// Collect the nested types of every entity, in the order given
    pub fn gather(provider: &ProviderInfo, schemas: &[EntitySchema]) -> Result<Self> {
        let mut types = Self::new();
        for schema in schemas {
            let overrides = provider
                .entity(schema.kind, &schema.tf_name)
                .map(|info| &info.fields);
            types.gather_from_entity(schema, overrides)?;
        }
        Ok(types)
    }

    /// Declare every nested object type reachable from one entity.
    ///
    /// Resources are walked inputs, outputs then state; data sources are
    /// walked arguments then results.
    pub fn gather_from_entity(
        &mut self,
        schema: &EntitySchema,
        overrides: Option<&Overrides>,
    ) -> Result<()> {
        let root = NestedTypeGraph::new(&schema.type_name);
        let entity = TypePath::entity(&schema.tf_name);

        let sides: Vec<(&str, &[Property], Side)> = match schema.kind {
            DocKind::Resources => vec![
                ("inputs", schema.inputs.as_slice(), Side::Input),
                ("outputs", schema.outputs.as_slice(), Side::Output),
                ("state", schema.state.as_slice(), Side::Input),
            ],
            DocKind::DataSources => vec![
                ("args", schema.inputs.as_slice(), Side::Input),
                ("results", schema.outputs.as_slice(), Side::Output),
            ],
        };

        for (segment, properties, side) in sides {
            let walk = Walk {
                declarer: &schema.tf_name,
                side,
            };
            let parent = entity.child(segment);
            self.gather_from_properties(&walk, &root, &parent, properties, overrides)?;
        }
        Ok(())
    }

    fn gather_from_properties(
        &mut self,
        walk: &Walk<'_>,
        graph: &NestedTypeGraph,
        parent: &TypePath,
        properties: &[Property],
        overrides: Option<&Overrides>,
    ) -> Result<()> {
        for property in properties {
            let info = overrides.and_then(|o| o.get(&property.name));
            if info.is_some_and(|i| i.omit) {
                if !property.optional {
                    return Err(GeneratorError::RequiredFieldOmitted {
                        resource: walk.declarer.to_string(),
                        field: property.name.clone(),
                    });
                }
                debug!(field = %property.name, path = %parent, "skipping omitted field");
                continue;
            }

            let mut name = info
                .and_then(|i| i.name.as_deref())
                .unwrap_or(&property.name)
                .to_string();
            if matches!(property.typ.kind, PropertyKind::List | PropertyKind::Set) {
                name = singularize(&name);
            }

            self.gather_from_type(
                walk,
                graph,
                &parent.child(&property.name),
                &name,
                &property.typ,
                info,
            )?;
        }
        Ok(())
    }

    fn gather_from_type(
        &mut self,
        walk: &Walk<'_>,
        graph: &NestedTypeGraph,
        path: &TypePath,
        name: &str,
        typ: &PropertyType,
        info: Option<&FieldInfo>,
    ) -> Result<()> {
        match typ.kind {
            PropertyKind::List | PropertyKind::Set | PropertyKind::Map => {
                if let Some(element) = &typ.element {
                    self.gather_from_type(walk, graph, &path.element(), name, element, info)?;
                }
            }
            PropertyKind::Object => {
                let graph = match explicit_type_name(info) {
                    Some(explicit) => {
                        self.declare_named(explicit, path.clone(), walk.declarer, typ, walk.side)?;
                        graph.create_branch(name)
                    }
                    None => {
                        let (graph, _) = self.declare_type(
                            path.clone(),
                            walk.declarer,
                            graph,
                            name,
                            typ,
                            walk.side,
                        )?;
                        graph
                    }
                };
                let nested = info.and_then(FieldInfo::object_fields);
                self.gather_from_properties(walk, &graph, path, &typ.properties, nested)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// A type name set on the field itself or on its collection element
fn explicit_type_name(info: Option<&FieldInfo>) -> Option<&str> {
    let info = info?;
    info.nested_type_name
        .as_deref()
        .or_else(|| info.elem.as_ref()?.nested_type_name.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfgen_common::ResourceInfo;

    fn string(name: &str) -> Property {
        Property::new(name, PropertyType::scalar(PropertyKind::String))
    }

    fn object(name: &str, properties: Vec<Property>) -> Property {
        Property::new(name, PropertyType::object(properties))
    }

    fn list_of(name: &str, properties: Vec<Property>) -> Property {
        Property::new(
            name,
            PropertyType::collection(PropertyKind::List, PropertyType::object(properties)),
        )
    }

    fn resource(tf_name: &str, type_name: &str, inputs: Vec<Property>) -> EntitySchema {
        EntitySchema {
            tf_name: tf_name.to_string(),
            type_name: type_name.to_string(),
            kind: DocKind::Resources,
            outputs: inputs.clone(),
            inputs,
            state: vec![],
        }
    }

    #[test]
    fn test_nested_objects_get_qualified_names() {
        let schema = resource(
            "aws_quicksight_template",
            "Template",
            vec![object(
                "definition",
                vec![object(
                    "analysis_defaults",
                    vec![object(
                        "default_new_sheet_configuration",
                        vec![string("sheet_content_type").optional()],
                    )],
                )],
            )],
        );

        let mut types = SchemaNestedTypes::new();
        types.gather_from_entity(&schema, None).unwrap();

        let names: Vec<&str> = types.name_to_type.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "TemplateDefinition",
                "TemplateDefinitionAnalysisDefaults",
                "TemplateDefinitionAnalysisDefaultsDefaultNewSheetConfiguration",
            ]
        );

        // inputs and outputs share each type
        let definition = types.get("TemplateDefinition").unwrap();
        assert_eq!(definition.type_paths.len(), 2);
        assert!(definition.required_inputs.is_some());
        assert!(definition.required_outputs.is_some());
    }

    #[test]
    fn test_collections_are_singularized() {
        let schema = resource(
            "aws_lb_listener",
            "Listener",
            vec![list_of("default_actions", vec![string("type")])],
        );
        let mut types = SchemaNestedTypes::new();
        types.gather_from_entity(&schema, None).unwrap();

        let action = types.get("ListenerDefaultAction").unwrap();
        assert!(action
            .type_paths
            .iter()
            .any(|p| p.as_str() == "aws_lb_listener.inputs.default_actions.$"));
        assert_eq!(action.required.len(), 1);
    }

    #[test]
    fn test_es_plural_collection_names() {
        let schema = resource(
            "aws_route53_record",
            "Record",
            vec![
                list_of("aliases", vec![string("name")]),
                list_of("caches", vec![string("ttl")]),
            ],
        );
        let mut types = SchemaNestedTypes::new();
        types.gather_from_entity(&schema, None).unwrap();

        assert!(types.get("RecordAlias").is_some());
        assert!(types.get("RecordCache").is_some());
        assert!(types.get("RecordAliase").is_none());
    }

    #[test]
    fn test_data_source_sides() {
        let schema = EntitySchema {
            tf_name: "aws_ami".to_string(),
            type_name: "GetAmi".to_string(),
            kind: DocKind::DataSources,
            inputs: vec![list_of("filters", vec![string("name")])],
            outputs: vec![list_of("block_device_mappings", vec![string("device_name")])],
            state: vec![],
        };
        let mut types = SchemaNestedTypes::new();
        types.gather_from_entity(&schema, None).unwrap();

        let filter = types.get("GetAmiFilter").unwrap();
        assert_eq!(
            filter.type_paths.iter().next().unwrap().as_str(),
            "aws_ami.args.filters.$"
        );
        let mapping = types.get("GetAmiBlockDeviceMapping").unwrap();
        assert!(mapping.required_inputs.is_none());
        assert!(mapping.required_outputs.is_some());
    }

    #[test]
    fn test_omitting_required_field_fails() {
        let schema = resource("aws_s3_bucket", "Bucket", vec![string("bucket")]);
        let overrides = Overrides::from([(
            "bucket".to_string(),
            FieldInfo {
                omit: true,
                ..Default::default()
            },
        )]);

        let mut types = SchemaNestedTypes::new();
        let err = types
            .gather_from_entity(&schema, Some(&overrides))
            .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::RequiredFieldOmitted { ref resource, ref field }
                if resource == "aws_s3_bucket" && field == "bucket"
        ));
    }

    #[test]
    fn test_omitting_optional_field_skips_it() {
        let schema = resource(
            "aws_s3_bucket",
            "Bucket",
            vec![object("website", vec![string("index_document")]).optional()],
        );
        let overrides = Overrides::from([(
            "website".to_string(),
            FieldInfo {
                omit: true,
                ..Default::default()
            },
        )]);

        let mut types = SchemaNestedTypes::new();
        types
            .gather_from_entity(&schema, Some(&overrides))
            .unwrap();
        assert!(types.is_empty());
    }

    #[test]
    fn test_explicit_nested_type_name() {
        let schema = resource(
            "aws_s3_bucket",
            "Bucket",
            vec![list_of(
                "lifecycle_rules",
                vec![object("expiration", vec![string("days")])],
            )],
        );
        let overrides = Overrides::from([(
            "lifecycle_rules".to_string(),
            FieldInfo {
                elem: Some(Box::new(FieldInfo {
                    nested_type_name: Some("LifecycleRule".to_string()),
                    ..Default::default()
                })),
                ..Default::default()
            },
        )]);

        let mut types = SchemaNestedTypes::new();
        types
            .gather_from_entity(&schema, Some(&overrides))
            .unwrap();
        assert!(types.get("LifecycleRule").is_some());
        assert!(types.get("BucketLifecycleRuleExpiration").is_some());
    }

    #[test]
    fn test_same_shape_across_entities_is_reused() {
        let tags = || object("tag_spec", vec![string("key"), string("value")]);
        let first = resource("aws_instance", "Instance", vec![tags()]);
        let mut second = resource("aws_instance_v2", "Instance", vec![tags()]);
        second.outputs.clear();

        let mut provider = ProviderInfo::default();
        provider
            .resources
            .insert("aws_instance".to_string(), ResourceInfo::default());

        let types = SchemaNestedTypes::gather(&provider, &[first, second]).unwrap();
        assert_eq!(types.len(), 1);
        let spec = types.get("InstanceTagSpec").unwrap();
        assert_eq!(spec.declarer, "aws_instance_v2");
        assert_eq!(spec.type_paths.len(), 3);
    }

    #[test]
    fn test_different_shape_from_other_entity_fails() {
        let first = resource(
            "aws_instance",
            "Instance",
            vec![object("tag_spec", vec![string("key")])],
        );
        let second = resource(
            "aws_instance_v2",
            "Instance",
            vec![object("tag_spec", vec![string("name")])],
        );

        let result = SchemaNestedTypes::gather(&ProviderInfo::default(), &[first, second]);
        assert!(matches!(result, Err(GeneratorError::DuplicateType { .. })));
    }
}
