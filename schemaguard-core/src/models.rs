//! Entity schema descriptors.
//!
//! These are the language-neutral descriptions of entity types that the
//! validator consumes. A catalog is simply a slice of [`EntityDescriptor`]s;
//! entities reference each other by name and are resolved against the
//! catalog by lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Long,
    /// Single-precision floating point
    Float,
    /// Double-precision floating point
    Double,
    /// Text
    String,
    /// Boolean
    Boolean,
    /// Binary data
    Blob,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Integer => write!(f, "integer"),
            FieldType::Long => write!(f, "long"),
            FieldType::Float => write!(f, "float"),
            FieldType::Double => write!(f, "double"),
            FieldType::String => write!(f, "string"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Blob => write!(f, "blob"),
        }
    }
}

impl FieldType {
    /// SQL column type used in remediation snippets.
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Integer | FieldType::Long | FieldType::Boolean => "INTEGER",
            FieldType::Float | FieldType::Double => "REAL",
            FieldType::String => "TEXT",
            FieldType::Blob => "BLOB",
        }
    }
}

/// Referential action applied to child rows when a parent row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    /// Delete or update child rows along with the parent
    Cascade,
    /// Set the child columns to NULL
    SetNull,
    /// Set the child columns to their default value
    SetDefault,
    /// Reject the parent change while children exist
    Restrict,
    /// Take no action (deferred constraint failure)
    #[default]
    NoAction,
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferentialAction::Cascade => write!(f, "CASCADE"),
            ReferentialAction::SetNull => write!(f, "SET NULL"),
            ReferentialAction::SetDefault => write!(f, "SET DEFAULT"),
            ReferentialAction::Restrict => write!(f, "RESTRICT"),
            ReferentialAction::NoAction => write!(f, "NO ACTION"),
        }
    }
}

/// Kind of a declared relation between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// The declaring entity is the parent of many target rows
    OneToMany,
    /// The declaring entity is a child of one target row
    ManyToOne,
    /// One-to-one link in either direction
    OneToOne,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::OneToMany => write!(f, "one-to-many"),
            RelationKind::ManyToOne => write!(f, "many-to-one"),
            RelationKind::OneToOne => write!(f, "one-to-one"),
        }
    }
}

/// Structural invariant violations raised while building descriptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Parent and child column lists differ in length
    #[error(
        "foreign key to '{referenced_entity}' declares {parent_count} parent columns but {child_count} child columns"
    )]
    ColumnCountMismatch {
        /// Entity the foreign key points at
        referenced_entity: String,
        /// Number of parent columns
        parent_count: usize,
        /// Number of child columns
        child_count: usize,
    },
    /// Foreign key without any columns
    #[error("foreign key to '{referenced_entity}' declares no columns")]
    EmptyForeignKey {
        /// Entity the foreign key points at
        referenced_entity: String,
    },
    /// Index without any columns
    #[error("index {name:?} declares no columns")]
    EmptyIndex {
        /// Explicit index name, if declared
        name: Option<String>,
    },
    /// Field type name outside the supported set
    #[error("unknown field type '{0}'")]
    UnknownFieldType(String),
    /// Entity declaration without a usable name
    #[error("entity name is missing or blank")]
    MissingEntityName,
}

/// A single field (column) of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name in the application model
    pub name: String,
    /// Column name in the database
    pub column_name: String,
    /// Declared storage type
    pub field_type: FieldType,
    /// Whether the column accepts NULL
    pub is_nullable: bool,
    /// Whether the field is part of the primary key
    pub is_primary_key: bool,
    /// Whether the value is generated by the database
    pub auto_generate: bool,
}

impl FieldDescriptor {
    /// Creates a non-nullable field whose column name equals its field name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            column_name: name.clone(),
            name,
            field_type,
            is_nullable: false,
            is_primary_key: false,
            auto_generate: false,
        }
    }

    /// Sets the column name when it differs from the field name.
    pub fn with_column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = column_name.into();
        self
    }

    /// Marks the field nullable.
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Marks the field as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Marks the field as auto-generated.
    pub fn auto_generate(mut self) -> Self {
        self.auto_generate = true;
        self
    }

    /// Whether `reference` names this field, by column name or field name.
    pub fn is_named(&self, reference: &str) -> bool {
        self.column_name == reference || self.name == reference
    }
}

/// Foreign key from an entity's child columns to a referenced entity.
///
/// Parent and child columns correspond positionally; [`ForeignKeyDescriptor::new`]
/// guarantees both lists have the same non-zero length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Entity the foreign key points at
    pub referenced_entity: String,
    /// Referenced columns on the parent entity
    pub parent_columns: Vec<String>,
    /// Referencing columns on this entity
    pub child_columns: Vec<String>,
    /// Action when the parent row is deleted
    pub on_delete: ReferentialAction,
    /// Action when the parent key is updated
    pub on_update: ReferentialAction,
}

impl ForeignKeyDescriptor {
    /// Creates a foreign key with `NO ACTION` delete and update policies.
    pub fn new(
        referenced_entity: impl Into<String>,
        parent_columns: Vec<String>,
        child_columns: Vec<String>,
    ) -> Result<Self, DescriptorError> {
        let referenced_entity = referenced_entity.into();
        if parent_columns.is_empty() && child_columns.is_empty() {
            return Err(DescriptorError::EmptyForeignKey { referenced_entity });
        }
        if parent_columns.len() != child_columns.len() {
            return Err(DescriptorError::ColumnCountMismatch {
                referenced_entity,
                parent_count: parent_columns.len(),
                child_count: child_columns.len(),
            });
        }
        Ok(Self {
            referenced_entity,
            parent_columns,
            child_columns,
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        })
    }

    /// Single-column convenience constructor.
    pub fn single(
        referenced_entity: impl Into<String>,
        parent_column: impl Into<String>,
        child_column: impl Into<String>,
    ) -> Self {
        Self {
            referenced_entity: referenced_entity.into(),
            parent_columns: vec![parent_column.into()],
            child_columns: vec![child_column.into()],
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        }
    }

    /// Sets the on-delete action.
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Sets the on-update action.
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }

    /// Iterates `(parent, child)` column pairs.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parent_columns
            .iter()
            .zip(&self.child_columns)
            .map(|(parent, child)| (parent.as_str(), child.as_str()))
    }
}

/// Declared index on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Explicit index name, if declared
    pub name: Option<String>,
    /// Indexed columns, in index order
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness
    pub is_unique: bool,
}

impl IndexDescriptor {
    /// Creates an unnamed, non-unique index.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            name: None,
            columns,
            is_unique: false,
        }
    }

    /// Sets the index name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the index unique.
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Name used in reports: the declared name or `index_<table>_<columns>`.
    pub fn display_name(&self, table_name: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("index_{}_{}", table_name, self.columns.join("_")),
        }
    }
}

/// A declared relation between the owning entity and a target entity.
///
/// For [`RelationKind::OneToMany`] the target holds the foreign key
/// (`target_column` → `local_column`); for [`RelationKind::ManyToOne`] the
/// owning entity holds it (`local_column` → `target_column`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Model field carrying the relation
    pub field_name: String,
    /// Cardinality of the relation
    pub kind: RelationKind,
    /// Entity on the other side
    pub target_entity: String,
    /// Column on the declaring entity
    pub local_column: String,
    /// Column on the target entity
    pub target_column: String,
}

impl RelationDescriptor {
    /// Creates a relation declaration.
    pub fn new(
        field_name: impl Into<String>,
        kind: RelationKind,
        target_entity: impl Into<String>,
        local_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            kind,
            target_entity: target_entity.into(),
            local_column: local_column.into(),
            target_column: target_column.into(),
        }
    }
}

/// Complete description of one entity (table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity (table) name, unique within a catalog
    pub table_name: String,
    /// Declared fields, in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Primary key field or column names
    pub primary_keys: Vec<String>,
    /// Outgoing foreign keys
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    /// Declared indexes
    pub indexes: Vec<IndexDescriptor>,
    /// Declared relations
    #[serde(default)]
    pub relations: Vec<RelationDescriptor>,
    /// Root/reference tables are expected to stand alone
    #[serde(default)]
    pub is_root: bool,
}

impl EntityDescriptor {
    /// Creates an empty entity descriptor.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            fields: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            relations: Vec::new(),
            is_root: false,
        }
    }

    /// Adds a field. Fields flagged as primary key are appended to the
    /// declared primary key list.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        if field.is_primary_key && !self.primary_keys.contains(&field.column_name) {
            self.primary_keys.push(field.column_name.clone());
        }
        self.fields.push(field);
        self
    }

    /// Replaces the declared primary key with an explicit (possibly composite) list.
    pub fn with_primary_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a foreign key.
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyDescriptor) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Adds an index.
    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a relation declaration.
    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    /// Designates the entity a root/reference table.
    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Looks up a field by column name first, then by field name.
    pub fn field(&self, reference: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.column_name == reference)
            .or_else(|| self.fields.iter().find(|f| f.name == reference))
    }

    /// Resolves the declared primary key names to column names.
    ///
    /// Unresolvable names are returned unchanged.
    pub fn primary_key_columns(&self) -> Vec<String> {
        self.primary_keys
            .iter()
            .map(|key| match self.field(key) {
                Some(field) => field.column_name.clone(),
                None => key.clone(),
            })
            .collect()
    }

    /// Whether the entity declares more than one primary key column.
    pub fn has_composite_key(&self) -> bool {
        self.primary_keys.len() > 1
    }

    /// Whether any foreign key points at `entity`.
    pub fn references(&self, entity: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.referenced_entity == entity)
    }
}

/// Finds an entity by table name.
pub fn find_entity<'a>(catalog: &'a [EntityDescriptor], name: &str) -> Option<&'a EntityDescriptor> {
    catalog.iter().find(|entity| entity.table_name == name)
}
