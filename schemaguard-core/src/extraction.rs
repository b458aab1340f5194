//! Metadata extraction.
//!
//! Turns explicit entity declarations (typically read from a JSON catalog
//! document) into [`EntityDescriptor`]s. Extraction is lenient at the batch
//! level: a declaration that cannot be resolved is skipped with a logged
//! diagnostic and the remaining entities are still extracted, in input order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::models::{
    DescriptorError, EntityDescriptor, FieldDescriptor, FieldType, ForeignKeyDescriptor,
    IndexDescriptor, ReferentialAction, RelationDescriptor,
};

/// Declared field as written in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Field name in the application model
    pub name: String,
    /// Column name, defaulting to the field name
    #[serde(default)]
    pub column_name: Option<String>,
    /// Type name such as `long` or `string`
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,
    /// Whether the field is part of the primary key
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the value is generated by the database
    #[serde(default)]
    pub auto_generate: bool,
}

/// Declared foreign key as written in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyDeclaration {
    /// Referenced entity
    pub entity: String,
    /// Referenced columns on the parent entity
    pub parent_columns: Vec<String>,
    /// Referencing columns on this entity
    pub child_columns: Vec<String>,
    /// Action when the parent row is deleted
    #[serde(default)]
    pub on_delete: ReferentialAction,
    /// Action when the parent key is updated
    #[serde(default)]
    pub on_update: ReferentialAction,
}

/// Declared index as written in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDeclaration {
    /// Explicit index name
    #[serde(default)]
    pub name: Option<String>,
    /// Indexed columns
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness
    #[serde(default)]
    pub unique: bool,
}

/// Explicit, language-neutral declaration of one entity.
///
/// The entity name is taken from `table_name`, falling back to `name`.
/// When `primary_keys` is empty the key is inferred from fields flagged
/// `primary_key`, in field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDeclaration {
    /// Table name
    pub table_name: Option<String>,
    /// Entity name, used when `table_name` is absent
    pub name: Option<String>,
    /// Declared fields
    pub fields: Vec<FieldDeclaration>,
    /// Explicit primary key, in key order
    pub primary_keys: Vec<String>,
    /// Outgoing foreign keys
    pub foreign_keys: Vec<ForeignKeyDeclaration>,
    /// Declared indexes
    pub indexes: Vec<IndexDeclaration>,
    /// Declared relations
    pub relations: Vec<RelationDescriptor>,
    /// Marks a root/reference table
    pub root: bool,
}

impl EntityDeclaration {
    /// Resolves the entity name, ignoring blank values.
    pub fn resolved_name(&self) -> Option<&str> {
        [self.table_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

/// Parses a declared type tag. Common SQL spellings are accepted.
pub fn parse_field_type(tag: &str) -> Result<FieldType, DescriptorError> {
    match tag.trim().to_ascii_lowercase().as_str() {
        "integer" | "int" | "int32" => Ok(FieldType::Integer),
        "long" | "long_integer" | "bigint" | "int64" => Ok(FieldType::Long),
        "float" | "float32" => Ok(FieldType::Float),
        "double" | "real" | "float64" => Ok(FieldType::Double),
        "string" | "text" | "varchar" => Ok(FieldType::String),
        "boolean" | "bool" => Ok(FieldType::Boolean),
        "blob" | "bytes" | "binary" => Ok(FieldType::Blob),
        _ => Err(DescriptorError::UnknownFieldType(tag.to_string())),
    }
}

impl TryFrom<FieldDeclaration> for FieldDescriptor {
    type Error = DescriptorError;

    fn try_from(declaration: FieldDeclaration) -> Result<Self, Self::Error> {
        let field_type = parse_field_type(&declaration.field_type)?;
        let mut field = FieldDescriptor::new(declaration.name, field_type);
        if let Some(column_name) = declaration.column_name {
            field = field.with_column_name(column_name);
        }
        field.is_nullable = declaration.nullable;
        field.is_primary_key = declaration.primary_key;
        field.auto_generate = declaration.auto_generate;
        Ok(field)
    }
}

impl TryFrom<EntityDeclaration> for EntityDescriptor {
    type Error = DescriptorError;

    fn try_from(declaration: EntityDeclaration) -> Result<Self, Self::Error> {
        let name = declaration
            .resolved_name()
            .ok_or(DescriptorError::MissingEntityName)?
            .to_string();

        let mut entity = EntityDescriptor::new(name);
        for field in declaration.fields {
            entity = entity.with_field(FieldDescriptor::try_from(field)?);
        }
        if !declaration.primary_keys.is_empty() {
            entity = entity.with_primary_keys(declaration.primary_keys);
        }
        for fk in declaration.foreign_keys {
            let foreign_key =
                ForeignKeyDescriptor::new(fk.entity, fk.parent_columns, fk.child_columns)?
                    .on_delete(fk.on_delete)
                    .on_update(fk.on_update);
            entity = entity.with_foreign_key(foreign_key);
        }
        for index in declaration.indexes {
            if index.columns.is_empty() {
                return Err(DescriptorError::EmptyIndex { name: index.name });
            }
            let mut descriptor = IndexDescriptor::new(index.columns);
            descriptor.name = index.name;
            descriptor.is_unique = index.unique;
            entity = entity.with_index(descriptor);
        }
        entity.relations = declaration.relations;
        entity.is_root = declaration.root;
        Ok(entity)
    }
}

/// Extracts descriptors from typed declarations.
///
/// Declarations without a resolvable name, with invalid structure, or whose
/// name repeats an earlier entity are skipped with a warning.
pub fn extract_declarations(declarations: Vec<EntityDeclaration>) -> Vec<EntityDescriptor> {
    let mut entities = Vec::with_capacity(declarations.len());
    let mut seen = HashSet::new();

    for (position, declaration) in declarations.into_iter().enumerate() {
        let label = declaration
            .resolved_name()
            .map_or_else(|| format!("#{}", position), |name| format!("'{}'", name));

        match EntityDescriptor::try_from(declaration) {
            Ok(entity) => {
                if seen.insert(entity.table_name.clone()) {
                    entities.push(entity);
                } else {
                    tracing::warn!(
                        "Skipping entity declaration {}: duplicate entity name",
                        label
                    );
                }
            }
            Err(e) => {
                tracing::warn!("Skipping entity declaration {}: {}", label, e);
            }
        }
    }

    tracing::debug!("Extracted {} entity descriptors", entities.len());
    entities
}

/// Extracts descriptors from raw JSON entity definitions.
///
/// Definitions that do not deserialize into an [`EntityDeclaration`] are
/// skipped with a warning, as are those rejected by [`extract_declarations`].
pub fn extract_entities(definitions: &[Value]) -> Vec<EntityDescriptor> {
    let declarations = definitions
        .iter()
        .enumerate()
        .filter_map(|(position, definition)| {
            match serde_json::from_value::<EntityDeclaration>(definition.clone()) {
                Ok(declaration) => Some(declaration),
                Err(e) => {
                    tracing::warn!("Skipping entity definition #{}: {}", position, e);
                    None
                }
            }
        })
        .collect();

    extract_declarations(declarations)
}
