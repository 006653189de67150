use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, Ident, Type, Variant};

/// What the expansion needs to know about one enum variant.
struct VariantShape<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    /// Fields other than `source` and `context`.
    payload_fields: usize,
    cfg_attrs: Vec<Attribute>,
}

impl VariantShape<'_> {
    fn source_ident(&self) -> Option<&Ident> {
        self.source.and_then(|field| field.ident.as_ref())
    }

    /// A `From<Source>` impl is only possible when nothing besides the source and the
    /// context has to be filled in.
    fn convertible(&self) -> bool {
        self.source.is_some() && self.has_context && self.payload_fields == 0
    }

    fn is_internal(&self) -> bool {
        self.ident == "Internal"
    }
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let name = &input.ident;
    let ext_trait = format_ident!("{}Ext", name);

    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("packhub_error can only be applied to enums"); };
    };

    let shapes = match data.variants.iter().map(inspect_variant).collect::<Result<Vec<_>, _>>() {
        Ok(shapes) => shapes,
        Err(err) => return err.to_compile_error(),
    };
    if let Err(err) = check_sources_have_context(&shapes) {
        return err.to_compile_error();
    }

    let derives = missing_derives(&input);
    let context_trait = context_trait(name, &ext_trait, &shapes);
    let source_impls = shapes
        .iter()
        .filter(|shape| shape.convertible() && !shape.is_internal())
        .map(|shape| source_conversion(name, &ext_trait, shape));
    let message_impls = internal_conversions(name, &shapes);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#source_impls)*
        #message_impls

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn inspect_variant(variant: &Variant) -> syn::Result<VariantShape<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "packhub_error variants must use named fields",
        ));
    };

    let has_context = context_field(fields)?.is_some();
    let source = fields.named.iter().find(|field| is_source(field));
    let payload_fields = fields
        .named
        .iter()
        .filter(|field| !is_source(field))
        .filter(|field| field.ident.as_ref().is_none_or(|ident| ident != "context"))
        .count();

    Ok(VariantShape {
        ident: &variant.ident,
        source,
        has_context,
        payload_fields,
        cfg_attrs: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect(),
    })
}

fn context_field(fields: &FieldsNamed) -> syn::Result<Option<&Field>> {
    let Some(field) =
        fields.named.iter().find(|field| field.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };

    if is_optional_cow_str(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn check_sources_have_context(shapes: &[VariantShape<'_>]) -> syn::Result<()> {
    match shapes.iter().find(|shape| shape.source.is_some() && !shape.has_context) {
        Some(shape) => Err(syn::Error::new_spanned(
            shape.ident,
            "packhub_error variants with a source need `context: Option<Cow<'static, str>>`",
        )),
        None => Ok(()),
    }
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let present = derived_names(input);
    let mut wanted = Vec::new();
    if !present.contains("Debug") {
        wanted.push(quote! { Debug });
    }
    if !present.contains("Error") {
        wanted.push(quote! { ::thiserror::Error });
    }

    if wanted.is_empty() { quote! {} } else { quote! { #[derive(#(#wanted),*)] } }
}

fn derived_names(input: &DeriveInput) -> FxHashSet<String> {
    let mut names = FxHashSet::default();

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                names.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    names
}

fn context_trait(name: &Ident, ext_trait: &Ident, shapes: &[VariantShape<'_>]) -> TokenStream {
    let arms = shapes.iter().filter(|shape| shape.has_context).map(|shape| {
        let cfg_attrs = &shape.cfg_attrs;
        let ident = shape.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            /// Attaches a human-readable context to the error branch.
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #( #arms )*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_conversion(name: &Ident, ext_trait: &Ident, shape: &VariantShape<'_>) -> TokenStream {
    let (Some(field), Some(source)) = (shape.source, shape.source_ident()) else {
        return quote! {};
    };
    let source_ty = &field.ty;
    let variant = shape.ident;
    let cfg_attrs = &shape.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#source_ty> for #name {
            #[inline]
            fn from(#source: #source_ty) -> Self { Self::#variant { #source, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext_trait<T> for std::result::Result<T, #source_ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#source| #name::#variant { #source, context: Some(context.into()) })
            }
        }
    }
}

fn internal_conversions(name: &Ident, shapes: &[VariantShape<'_>]) -> TokenStream {
    let Some(internal) = shapes.iter().find(|shape| shape.is_internal()) else {
        return quote! {};
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: std::borrow::Cow::Borrowed(message), context: None }
            }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

/// Matches `Option<Cow<'static, str>>` by the last path segment of each component.
fn is_optional_cow_str(ty: &Type) -> bool {
    let Some(inner) = single_type_argument(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = inner else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let lifetime_ok = matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_ok = matches!(
        args.next(),
        Some(syn::GenericArgument::Type(Type::Path(p)))
            if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );
    lifetime_ok && str_ok
}

fn single_type_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
