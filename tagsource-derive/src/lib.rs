//! Derive macro implementation for tagsource

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

mod shape;

use shape::FieldShape;

/// `TagDecode` derive macro
///
/// Implements the `TagDecode` trait for structs with named fields. Each
/// field may carry a `#[tag("...")]` attribute with a comma-separated list
/// of constraint segments; a field without the attribute decodes under its
/// own name with no constraints.
///
/// # Example
///
/// See the `tagsource` crate documentation for the full tag grammar and
/// usage examples.
#[proc_macro_derive(TagDecode, attributes(tag))]
pub fn derive_tagdecode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &input,
                    "TagDecode only supports structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "TagDecode only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let field_steps = fields.iter().map(|field| {
        let field_name = field.ident.as_ref().unwrap();
        let data_key = field_name.to_string();

        let tag = match tag_literal(field) {
            Ok(tag) => tag,
            Err(err) => return err.to_compile_error(),
        };

        let shape = match FieldShape::classify(&field.ty) {
            Ok(shape) => shape,
            Err(message) => {
                return syn::Error::new_spanned(field, message).to_compile_error();
            }
        };

        let type_tag = shape.type_tag();
        let binder = shape.binder();

        quote! {
            {
                let mut __attr = ::tagsource::Attribute::new(
                    #data_key,
                    #type_tag,
                    __key_path_parent,
                    #tag,
                )?;
                let __raw = __decoder.source().get(&__attr.key_path());
                __attr.set_value(__raw, __decoder.environ())?;
                __decoder.#binder(&mut self.#field_name, &__attr)?;
            }
        }
    });

    let expanded = quote! {
        impl ::tagsource::TagDecode for #struct_name {
            fn decode_fields(
                &mut self,
                __decoder: &::tagsource::Decoder,
                __key_path_parent: &str,
            ) -> ::core::result::Result<(), ::tagsource::TagError> {
                #(#field_steps)*
                ::core::result::Result::Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}

/// The field's `#[tag("...")]` string, or "" when the attribute is absent.
fn tag_literal(field: &Field) -> Result<String, syn::Error> {
    for attr in &field.attrs {
        if !attr.path().is_ident("tag") {
            continue;
        }
        let literal: syn::LitStr = attr.parse_args()?;
        return Ok(literal.value());
    }
    Ok(String::new())
}
