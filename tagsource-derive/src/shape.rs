//! Structural classification of field types.
//!
//! The decoder dispatches on a field's shape: scalar, sequence of scalars,
//! sequence of records, map of scalars, map of records, or nested record.
//! Classification is purely syntactic, driven by the type's last path
//! segment, so type aliases that hide a container are decoded as records.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// How a field participates in decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar(ScalarKind),
    PrimList(ListKind),
    StructList,
    PrimMap,
    StructMap,
    Struct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bool,
    Int,
    Float,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    String,
    Int,
    Float,
    Other,
}

impl FieldShape {
    /// Classify a field type, or explain why it cannot be decoded.
    pub fn classify(ty: &Type) -> Result<Self, String> {
        let Type::Path(type_path) = ty else {
            return Err("field type must be a plain named type".to_string());
        };
        let Some(segment) = type_path.path.segments.last() else {
            return Err("field type must be a plain named type".to_string());
        };
        let ident = segment.ident.to_string();

        match ident.as_str() {
            "Option" => {
                return Err(
                    "Option fields are not supported; use a default instead".to_string()
                );
            }
            "String" => return Ok(FieldShape::Scalar(ScalarKind::String)),
            "bool" => return Ok(FieldShape::Scalar(ScalarKind::Bool)),
            "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "usize" => return Ok(FieldShape::Scalar(ScalarKind::Int)),
            "f32" | "f64" => return Ok(FieldShape::Scalar(ScalarKind::Float)),
            "Value" => return Ok(FieldShape::Scalar(ScalarKind::Value)),
            "Vec" => {
                let inner = generic_arg(&segment.arguments, 0)
                    .ok_or_else(|| "Vec field must name its element type".to_string())?;
                return Ok(match type_ident(inner).as_deref() {
                    Some("String") => FieldShape::PrimList(ListKind::String),
                    Some(
                        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32"
                        | "u64" | "usize",
                    ) => FieldShape::PrimList(ListKind::Int),
                    Some("f32" | "f64") => FieldShape::PrimList(ListKind::Float),
                    Some("bool" | "Value") => FieldShape::PrimList(ListKind::Other),
                    _ => FieldShape::StructList,
                });
            }
            "HashMap" => {
                let value_ty = generic_arg(&segment.arguments, 1)
                    .ok_or_else(|| "HashMap field must name its value type".to_string())?;
                return Ok(match type_ident(value_ty).as_deref() {
                    Some(
                        "String" | "bool" | "i8" | "i16" | "i32" | "i64" | "isize" | "u8"
                        | "u16" | "u32" | "u64" | "usize" | "f32" | "f64" | "Value",
                    ) => FieldShape::PrimMap,
                    _ => FieldShape::StructMap,
                });
            }
            "BTreeMap" => {
                return Err("map fields must be HashMap<String, _>".to_string());
            }
            _ => {}
        }

        Ok(FieldShape::Struct)
    }

    /// The semantic type tag handed to the attribute engine.
    pub fn type_tag(self) -> TokenStream {
        match self {
            FieldShape::Scalar(ScalarKind::String) => quote!(::tagsource::TypeTag::String),
            FieldShape::Scalar(ScalarKind::Bool) => quote!(::tagsource::TypeTag::Bool),
            FieldShape::Scalar(ScalarKind::Int) => quote!(::tagsource::TypeTag::Int),
            FieldShape::Scalar(ScalarKind::Float) => quote!(::tagsource::TypeTag::Float),
            FieldShape::Scalar(ScalarKind::Value) => quote!(::tagsource::TypeTag::Other),
            FieldShape::PrimList(ListKind::String) => quote!(::tagsource::TypeTag::StrList),
            FieldShape::PrimList(ListKind::Int) => quote!(::tagsource::TypeTag::IntList),
            FieldShape::PrimList(ListKind::Float) => quote!(::tagsource::TypeTag::FloatList),
            FieldShape::PrimList(ListKind::Other)
            | FieldShape::StructList
            | FieldShape::PrimMap
            | FieldShape::StructMap => quote!(::tagsource::TypeTag::Other),
            FieldShape::Struct => quote!(::tagsource::TypeTag::Struct),
        }
    }

    /// Which decoder binder this shape routes through.
    pub fn binder(self) -> TokenStream {
        match self {
            FieldShape::Scalar(_) | FieldShape::PrimList(_) => quote!(bind),
            FieldShape::StructList => quote!(bind_struct_list),
            FieldShape::PrimMap => quote!(bind_map),
            FieldShape::StructMap => quote!(bind_struct_map),
            FieldShape::Struct => quote!(bind_struct),
        }
    }
}

fn generic_arg(arguments: &PathArguments, index: usize) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().nth(index).and_then(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn type_ident(ty: &Type) -> Option<String> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    type_path
        .path
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}
