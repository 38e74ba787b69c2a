use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, Ident, LitStr, Result};

struct ParsedField {
    ident: Ident,
    ty: syn::Type,
    logical_name: String,
    column: Option<String>,
    is_id: bool,
    excluded: bool,
}

pub(crate) fn generate_entity_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut table_name = name.to_string();
    for attr in &ast.attrs {
        if attr.path().is_ident("entity") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    table_name = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown entity attribute, expected `table`"))
                }
            })?;
        }
    }

    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "only structs with named fields can be entities",
            ))
        }
    };

    let mut parsed_fields = Vec::with_capacity(named.named.len());
    let mut id_seen = false;
    for field in &named.named {
        let ident = match &field.ident {
            Some(ident) => ident.clone(),
            None => continue,
        };
        let mut parsed = ParsedField {
            logical_name: ident.to_string().trim_start_matches("r#").to_string(),
            ident,
            ty: field.ty.clone(),
            column: None,
            is_id: false,
            excluded: false,
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    if id_seen {
                        return Err(meta.error("Multiple id fields are not allowed"));
                    }
                    id_seen = true;
                    parsed.is_id = true;
                    Ok(())
                } else if meta.path.is_ident("column") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    parsed.column = Some(s.value());
                    Ok(())
                } else if meta.path.is_ident("exclude") {
                    parsed.excluded = true;
                    Ok(())
                } else {
                    Err(meta.error("Unknown entity field attribute"))
                }
            })?;
        }

        if parsed.is_id && parsed.excluded {
            return Err(syn::Error::new_spanned(
                &parsed.ident,
                "the id field cannot be excluded",
            ));
        }
        parsed_fields.push(parsed);
    }

    let descriptor_fields = parsed_fields.iter().map(|parsed| {
        let logical = &parsed.logical_name;
        if parsed.excluded {
            return quote! {
                .field(::rowmap::mapper::FieldDescriptor::excluded(#logical))
            };
        }
        let ty = &parsed.ty;
        let column = parsed
            .column
            .as_ref()
            .map(|column| quote! { .with_column(#column) });
        let id = parsed.is_id.then(|| quote! { .with_id() });
        quote! {
            .field(::rowmap::mapper::FieldDescriptor::of::<#ty>(#logical) #column #id)
        }
    });

    let persistent: Vec<&ParsedField> = parsed_fields.iter().filter(|parsed| !parsed.excluded).collect();

    let read_arms = persistent.iter().map(|parsed| {
        let ident = &parsed.ident;
        let logical = &parsed.logical_name;
        quote! {
            #logical => ::rowmap::common::Convertible::to_value(&self.#ident),
        }
    });

    let write_arms = persistent.iter().map(|parsed| {
        let ident = &parsed.ident;
        let logical = &parsed.logical_name;
        quote! {
            #logical => {
                self.#ident = ::rowmap::common::Convertible::from_value(value)?;
                Ok(())
            }
        }
    });

    let field_consts = persistent.iter().map(|parsed| {
        let ty = &parsed.ty;
        let logical = &parsed.logical_name;
        let const_name = Ident::new(&constant_name(logical), Span::call_site());
        quote! {
            pub const #const_name: ::rowmap::mapper::Field<Self, #ty> =
                ::rowmap::mapper::Field::new(#logical);
        }
    });

    let gen = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#field_consts)*
        }

        impl #impl_generics ::rowmap::mapper::Entity for #name #ty_generics #where_clause {
            fn describe() -> ::rowmap::errors::RowMapResult<::rowmap::mapper::EntityDescriptor> {
                ::rowmap::mapper::EntityDescriptor::builder(#table_name)
                    #(#descriptor_fields)*
                    .build()
            }

            fn read_field(
                &self,
                logical_name: &str,
            ) -> ::rowmap::errors::RowMapResult<::rowmap::common::Value> {
                match logical_name {
                    #(#read_arms)*
                    _ => Err(::rowmap::errors::RowMapError::new(
                        logical_name,
                        ::rowmap::errors::ErrorKind::UnknownField,
                    )),
                }
            }

            fn write_field(
                &mut self,
                logical_name: &str,
                value: &::rowmap::common::Value,
            ) -> ::rowmap::errors::RowMapResult<()> {
                match logical_name {
                    #(#write_arms)*
                    _ => Err(::rowmap::errors::RowMapError::new(
                        logical_name,
                        ::rowmap::errors::ErrorKind::UnknownField,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// `userName` and `user_name` both become `USER_NAME`.
fn constant_name(logical_name: &str) -> String {
    let mut name = String::with_capacity(logical_name.len() + 4);
    for (index, ch) in logical_name.chars().enumerate() {
        if ch.is_uppercase() && index > 0 && !name.ends_with('_') {
            name.push('_');
        }
        name.extend(ch.to_uppercase());
    }
    name
}
