use proc_macro::TokenStream;

use quote::quote;
use syn::parse_macro_input;
use syn::ItemStruct;

/// Derive `SetType` for a marker struct. The engine type name is built from the
/// CamelCase words of the struct name: the first word is the storage method and
/// the rest are the data types, so `HashIpPort` becomes `hash:ip,port`.
/// Only hash types storing an ip or net take a `family` option.
#[proc_macro_derive(SetType)]
pub fn derive_set_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ItemStruct);
    let name = input.ident;
    let typename = match type_name(&name.to_string()) {
        Some(typename) => typename,
        None => {
            return syn::Error::new(
                name.span(),
                "SetType needs a method and at least one data type, like `HashIp`",
            )
            .to_compile_error()
            .into();
        }
    };

    let family = takes_family(&typename);

    quote!(
        impl SetType for #name {
            const TYPENAME: &'static str = #typename;
            const FAMILY: bool = #family;
        }
    )
    .into()
}

fn split_words(ident: &str) -> Vec<String> {
    let mut splits: Vec<String> = Vec::new();
    let mut item = Vec::new();
    for c in ident.chars() {
        if c.is_uppercase() && !item.is_empty() {
            splits.push(item.iter().collect());
            item.clear();
        }
        item.push(c);
    }
    if !item.is_empty() {
        splits.push(item.iter().collect());
    }
    splits
}

fn type_name(ident: &str) -> Option<String> {
    let words: Vec<String> = split_words(ident)
        .into_iter()
        .map(|word| word.to_lowercase())
        .collect();
    let (method, data_types) = words.split_first()?;
    if data_types.is_empty() {
        return None;
    }
    Some(format!("{}:{}", method, data_types.join(",")))
}

fn takes_family(typename: &str) -> bool {
    match typename.split_once(':') {
        Some(("hash", data_types)) => data_types
            .split(',')
            .any(|data_type| data_type == "ip" || data_type == "net"),
        _ => false,
    }
}
