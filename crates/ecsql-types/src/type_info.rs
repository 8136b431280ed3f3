//! ECSQL Type Descriptors
//!
//! This module defines the value type of an ECSQL expression:
//! - `TypeKind` discriminating primitive, enum, struct, navigation, point and geometry values
//! - `PrimitiveType` for the EC primitive types
//! - `DateTimeInfo` for the component and kind of DateTime values
//! - `TypeInfo`, the descriptor attached to every expression node

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ClassRef, EnumRef};

/// EC primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Binary blob
    Binary,
    /// Boolean
    Boolean,
    /// Date, time of day, or timestamp
    DateTime,
    /// 64-bit floating point
    Double,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// Two-dimensional point
    Point2d,
    /// Three-dimensional point
    Point3d,
    /// Unicode string
    String,
    /// Geometry stored as a blob
    IGeometry,
}

impl PrimitiveType {
    /// Get the EC name of this primitive type
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::Double => "Double",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Point2d => "Point2d",
            Self::Point3d => "Point3d",
            Self::String => "String",
            Self::IGeometry => "IGeometry",
        }
    }

    /// Check if this is a numeric type
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Double)
    }

    /// Check if this is a point type
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::Point2d | Self::Point3d)
    }

    /// The type kind a value of this primitive type has
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Point2d | Self::Point3d => TypeKind::Point,
            Self::IGeometry => TypeKind::Geometry,
            _ => TypeKind::Primitive,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of an expression's value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Not yet known (untyped parameter)
    Unset,
    /// Placeholder while children are being finalized
    Varies,
    /// The NULL literal
    Null,
    /// Scalar primitive value
    Primitive,
    /// Enumeration value
    Enum,
    /// Struct value
    Struct,
    /// Navigation property value
    NavigationProperty,
    /// Point2d or Point3d value
    Point,
    /// Geometry value
    Geometry,
}

/// Which components a DateTime value carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateTimeComponent {
    /// Date only
    Date,
    /// Time of day only
    TimeOfDay,
    /// Date and time
    #[default]
    DateAndTime,
}

impl DateTimeComponent {
    /// ECSQL literal keyword for this component
    pub const fn literal_keyword(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::TimeOfDay => "TIME",
            Self::DateAndTime => "TIMESTAMP",
        }
    }
}

/// Time zone kind of a DateTime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateTimeKind {
    /// No time zone information
    #[default]
    Unspecified,
    /// Coordinated universal time
    Utc,
    /// Local time
    Local,
}

/// Sub-descriptor of DateTime values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateTimeInfo {
    /// Date/time component
    pub component: DateTimeComponent,
    /// Time zone kind
    pub kind: DateTimeKind,
}

impl DateTimeInfo {
    /// Create a new DateTime info
    pub const fn new(component: DateTimeComponent, kind: DateTimeKind) -> Self {
        Self { component, kind }
    }

    /// Date only, no time zone
    pub const fn date_only() -> Self {
        Self::new(DateTimeComponent::Date, DateTimeKind::Unspecified)
    }

    /// Time of day only, no time zone
    pub const fn time_of_day() -> Self {
        Self::new(DateTimeComponent::TimeOfDay, DateTimeKind::Unspecified)
    }

    /// Date and time with the given kind
    pub const fn date_and_time(kind: DateTimeKind) -> Self {
        Self::new(DateTimeComponent::DateAndTime, kind)
    }
}

/// Value type of an expression
///
/// A type is complete iff its kind is neither `Unset` nor `Varies`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeInfo {
    kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primitive_type: Option<PrimitiveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time_info: Option<DateTimeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enumeration: Option<EnumRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    struct_class: Option<ClassRef>,
    #[serde(default)]
    is_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extended_type_name: Option<String>,
}

impl TypeInfo {
    fn with_kind(kind: TypeKind) -> Self {
        Self {
            kind,
            primitive_type: None,
            date_time_info: None,
            enumeration: None,
            struct_class: None,
            is_array: false,
            extended_type_name: None,
        }
    }

    // === Constructors ===

    /// Type of a not yet typed expression
    pub fn unset() -> Self {
        Self::with_kind(TypeKind::Unset)
    }

    /// Placeholder used while children are finalized
    pub fn varies() -> Self {
        Self::with_kind(TypeKind::Varies)
    }

    /// Type of the NULL literal
    pub fn null() -> Self {
        Self::with_kind(TypeKind::Null)
    }

    /// Create a scalar primitive type
    pub fn create_primitive(primitive_type: PrimitiveType) -> Self {
        Self::create_primitive_with(primitive_type, false, "")
    }

    /// Create a primitive type with array flag and extended type name
    ///
    /// An empty extended type name means none.
    pub fn create_primitive_with(
        primitive_type: PrimitiveType,
        is_array: bool,
        extended_type_name: &str,
    ) -> Self {
        let mut info = Self::with_kind(primitive_type.kind());
        info.primitive_type = Some(primitive_type);
        if primitive_type == PrimitiveType::DateTime {
            info.date_time_info = Some(DateTimeInfo::default());
        }
        info.is_array = is_array;
        if !extended_type_name.is_empty() {
            info.extended_type_name = Some(extended_type_name.to_string());
        }
        info
    }

    /// Create a DateTime type with the given component and kind
    pub fn create_date_time(date_time_info: DateTimeInfo) -> Self {
        let mut info = Self::create_primitive(PrimitiveType::DateTime);
        info.date_time_info = Some(date_time_info);
        info
    }

    /// Create an enumeration type
    pub fn create_enum(enumeration: EnumRef, is_array: bool) -> Self {
        let mut info = Self::with_kind(TypeKind::Enum);
        info.primitive_type = Some(enumeration.backing_type);
        info.enumeration = Some(enumeration);
        info.is_array = is_array;
        info
    }

    /// Create a struct type
    pub fn create_struct(struct_class: ClassRef, is_array: bool) -> Self {
        let mut info = Self::with_kind(TypeKind::Struct);
        info.struct_class = Some(struct_class);
        info.is_array = is_array;
        info
    }

    /// Create a navigation property type
    pub fn create_navigation() -> Self {
        Self::with_kind(TypeKind::NavigationProperty)
    }

    /// The array form of this type
    pub fn into_array(mut self) -> Self {
        self.is_array = true;
        self
    }

    // === Accessors ===

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Primitive type; the backing type for enumerations
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        self.primitive_type
    }

    pub fn date_time_info(&self) -> Option<DateTimeInfo> {
        self.date_time_info
    }

    pub fn enum_ref(&self) -> Option<&EnumRef> {
        self.enumeration.as_ref()
    }

    pub fn struct_ref(&self) -> Option<&ClassRef> {
        self.struct_class.as_ref()
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn extended_type_name(&self) -> Option<&str> {
        self.extended_type_name.as_deref()
    }

    fn scalar_primitive(&self) -> Option<PrimitiveType> {
        if self.is_array {
            None
        } else {
            self.primitive_type
        }
    }

    // === Predicates ===

    pub fn is_unset(&self) -> bool {
        self.kind == TypeKind::Unset
    }

    pub fn is_varies(&self) -> bool {
        self.kind == TypeKind::Varies
    }

    /// Check whether the type is final (neither unset nor varies)
    pub fn is_complete(&self) -> bool {
        !matches!(self.kind, TypeKind::Unset | TypeKind::Varies)
    }

    pub fn is_null(&self) -> bool {
        self.kind == TypeKind::Null
    }

    /// Check if this is a scalar primitive-backed type
    ///
    /// Points, geometries and enumerations count as primitive; arrays do not.
    pub fn is_primitive(&self) -> bool {
        !self.is_array
            && matches!(
                self.kind,
                TypeKind::Primitive | TypeKind::Point | TypeKind::Geometry | TypeKind::Enum
            )
    }

    pub fn is_numeric(&self) -> bool {
        self.scalar_primitive().is_some_and(|t| t.is_numeric())
    }

    pub fn is_exact_numeric(&self) -> bool {
        matches!(
            self.scalar_primitive(),
            Some(PrimitiveType::Integer | PrimitiveType::Long)
        )
    }

    pub fn is_approximate_numeric(&self) -> bool {
        self.scalar_primitive() == Some(PrimitiveType::Double)
    }

    pub fn is_string(&self) -> bool {
        self.scalar_primitive() == Some(PrimitiveType::String)
    }

    pub fn is_binary(&self) -> bool {
        self.scalar_primitive() == Some(PrimitiveType::Binary)
    }

    pub fn is_boolean(&self) -> bool {
        self.scalar_primitive() == Some(PrimitiveType::Boolean)
    }

    pub fn is_date_time(&self) -> bool {
        self.scalar_primitive() == Some(PrimitiveType::DateTime)
    }

    pub fn is_point(&self) -> bool {
        !self.is_array && self.kind == TypeKind::Point
    }

    pub fn is_geometry(&self) -> bool {
        !self.is_array && self.kind == TypeKind::Geometry
    }

    pub fn is_navigation(&self) -> bool {
        self.kind == TypeKind::NavigationProperty
    }

    pub fn is_struct(&self) -> bool {
        self.kind == TypeKind::Struct
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

impl Default for TypeInfo {
    fn default() -> Self {
        Self::unset()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeKind::Unset => f.write_str("<unset>")?,
            TypeKind::Varies => f.write_str("<varies>")?,
            TypeKind::Null => f.write_str("NULL")?,
            TypeKind::NavigationProperty => f.write_str("Navigation")?,
            TypeKind::Enum => match &self.enumeration {
                Some(e) => write!(f, "Enum {}", e.key)?,
                None => f.write_str("Enum")?,
            },
            TypeKind::Struct => match &self.struct_class {
                Some(c) => write!(f, "Struct {}", c.key)?,
                None => f.write_str("Struct")?,
            },
            TypeKind::Primitive | TypeKind::Point | TypeKind::Geometry => {
                match self.primitive_type {
                    Some(t) => write!(f, "{}", t)?,
                    None => f.write_str("Primitive")?,
                }
                if let Some(dt) = self.date_time_info {
                    match dt.component {
                        DateTimeComponent::Date => f.write_str(" (Date)")?,
                        DateTimeComponent::TimeOfDay => f.write_str(" (TimeOfDay)")?,
                        DateTimeComponent::DateAndTime if dt.kind == DateTimeKind::Utc => {
                            f.write_str(" (Utc)")?
                        }
                        DateTimeComponent::DateAndTime => {}
                    }
                }
            }
        }
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
