//! Console command attribute macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, Expr, Ident, ItemFn, LitStr, Token};

/// Arguments to the console_command attribute
///
/// Usage:
/// - `#[console_command("ping", "Respond with pong")]`
/// - `#[console_command("noclip", "Fly through walls", flags = ConFlags::CHEAT)]`
pub struct ConsoleCommandArgs {
    pub name: LitStr,
    pub description: LitStr,
    pub flags: Option<Expr>,
}

impl Parse for ConsoleCommandArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: LitStr = input.parse()?;
        input.parse::<Token![,]>()?;
        let description: LitStr = input.parse()?;

        let flags = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            let ident: Ident = input.parse()?;
            if ident != "flags" {
                return Err(syn::Error::new(ident.span(), "expected `flags`"));
            }
            input.parse::<Token![=]>()?;
            Some(input.parse::<Expr>()?)
        } else {
            None
        };

        if !input.is_empty() {
            return Err(input.error("unexpected tokens after console_command arguments"));
        }

        Ok(Self {
            name,
            description,
            flags,
        })
    }
}

/// Generate the console_command implementation
pub fn generate_console_command(args: ConsoleCommandArgs, func: ItemFn) -> TokenStream {
    let fn_name = &func.sig.ident;
    let fn_vis = &func.vis;
    let fn_block = &func.block;
    let fn_attrs = &func.attrs;

    let command_name = &args.name;
    let command_desc = &args.description;

    let command_fn_name = Ident::new(&format!("{}_command", fn_name), fn_name.span());
    let register_fn_name = Ident::new(&format!("{}_register", fn_name), fn_name.span());

    let flags = match &args.flags {
        Some(flags) => quote! { #flags },
        None => quote! { ::conreg_core::ConFlags::NONE },
    };

    quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name(info: &::conreg_core::commands::CommandInfo) #fn_block

        /// Build the console command for this handler
        #fn_vis fn #command_fn_name() -> ::conreg_core::commands::ConCommand {
            ::conreg_core::commands::ConCommand::new(#command_name, #fn_name)
                .with_description(#command_desc)
                .with_flags(#flags)
        }

        /// Register this command with the global console
        #fn_vis fn #register_fn_name() -> ::conreg_core::ConsoleResult<::conreg_core::CommandHandle> {
            ::conreg_core::console()?.register_command(#command_fn_name())
        }
    }
}
