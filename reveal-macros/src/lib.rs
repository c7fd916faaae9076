use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive macro implementing `Animatable` by interpolating every field
///
/// Each field type must itself implement `Animatable`. Fields marked
/// `#[animatable(skip)]` are not interpolated and keep the `from` value.
///
/// # Example
/// ```ignore
/// #[derive(Clone, PartialEq, Animatable)]
/// pub struct Hsl {
///     pub h: f32,
///     pub s: f32,
///     pub l: f32,
/// }
/// ```
#[proc_macro_derive(Animatable, attributes(animatable))]
pub fn derive_animatable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Animatable can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Animatable can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let field_inits: Vec<proc_macro2::TokenStream> = fields.iter().filter_map(field_init).collect();

    let expanded = quote! {
        impl #impl_generics ::reveal::animation::Animatable for #name #ty_generics #where_clause {
            fn lerp(from: &Self, to: &Self, t: f32) -> Self {
                Self {
                    #(#field_inits,)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// `field: <lerp of from.field and to.field>`, or a clone of `from` when skipped
fn field_init(field: &syn::Field) -> Option<proc_macro2::TokenStream> {
    let field_name = field.ident.as_ref()?;
    let field_type = &field.ty;

    if is_skipped(field) {
        return Some(quote! {
            #field_name: ::core::clone::Clone::clone(&from.#field_name)
        });
    }
    Some(quote! {
        #field_name: <#field_type as ::reveal::animation::Animatable>::lerp(
            &from.#field_name,
            &to.#field_name,
            t,
        )
    })
}

fn is_skipped(field: &syn::Field) -> bool {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("animatable"))
        .any(|attr| {
            let mut skip = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                }
                Ok(())
            });
            skip
        })
}
