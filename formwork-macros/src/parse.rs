use proc_macro2::{Delimiter, Literal, Span, TokenStream, TokenTree};
use unsynn::*;
// unsynn's glob brings a one-parameter `Result` alias
use core::result::Result;

use crate::DeriveError;
use crate::rename::RenameRule;

keyword! {
    KStruct = "struct";
    KEnum = "enum";
    KUnion = "union";
    KPub = "pub";
}

operator! {
    LAngle = "<";
}

unsynn! {
    /// `pub`, `pub(crate)`, `pub(in path)`
    enum Vis {
        PubIn(Cons<KPub, ParenthesisGroup>),
        Pub(KPub),
    }

    /// `#[...]`, doc comments included
    struct Attribute {
        _pound: Pound,
        content: BracketGroup,
    }

    enum DeriveInput {
        Struct(StructDef),
        Other(OtherDef),
    }

    struct StructDef {
        attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        _kw: KStruct,
        name: Ident,
        body: StructBody,
    }

    enum StructBody {
        Generic(LAngle),
        Named(BraceGroup),
        Tuple(ParenthesisGroup),
        Unit(Semicolon),
    }

    enum DataKeyword {
        Enum(KEnum),
        Union(KUnion),
    }

    /// Enums and unions, parsed only far enough to reject them
    struct OtherDef {
        _attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        kw: DataKeyword,
        name: Ident,
    }

    /// One named field, after the brace group has been split on top-level
    /// commas
    struct FieldDef {
        attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        name: Ident,
        _colon: Colon,
        ty: Vec<TokenTree>,
    }
}

/// A struct ready for code generation.
pub(crate) struct ParsedStruct {
    pub(crate) name: Ident,
    pub(crate) fields: Vec<ParsedField>,
}

/// A field that takes part in decoding (skipped fields are dropped).
pub(crate) struct ParsedField {
    pub(crate) ident: Ident,
    /// The key-path segment, after `rename` / `rename_all`
    pub(crate) effective: String,
    pub(crate) ty: TokenStream,
}

enum FormArg {
    Rename(String),
    RenameAll(RenameRule),
    Skip,
}

pub(crate) fn parse_struct(input: TokenStream) -> Result<ParsedStruct, DeriveError> {
    let mut iter = input.to_token_iter();
    let parsed: DeriveInput = iter.parse().map_err(|err| {
        DeriveError::new(
            Span::call_site(),
            format!("`FormSchema` could not parse this item: {err}"),
        )
    })?;

    let def = match parsed {
        DeriveInput::Struct(def) => def,
        DeriveInput::Other(other) => {
            let what = match other.kw {
                DataKeyword::Enum(_) => "enums",
                DataKeyword::Union(_) => "unions",
            };
            return Err(DeriveError::new(
                other.name.span(),
                format!("`FormSchema` cannot be derived for {what}, only for structs with named fields"),
            ));
        }
    };

    let mut rename_all = None;
    for (arg, span) in form_args(&def.attrs)? {
        match arg {
            FormArg::RenameAll(rule) => rename_all = Some(rule),
            FormArg::Rename(_) => {
                return Err(DeriveError::new(span, "`rename` goes on fields, use `rename_all` on the struct"));
            }
            FormArg::Skip => {
                return Err(DeriveError::new(span, "`skip` goes on fields"));
            }
        }
    }

    let body = match def.body {
        StructBody::Named(body) => body.0.stream(),
        StructBody::Unit(_) => TokenStream::new(),
        StructBody::Generic(_) => {
            return Err(DeriveError::new(
                def.name.span(),
                "`FormSchema` cannot be derived for generic structs",
            ));
        }
        StructBody::Tuple(_) => {
            return Err(DeriveError::new(
                def.name.span(),
                "`FormSchema` cannot be derived for tuple structs, fields need names",
            ));
        }
    };

    let mut fields: Vec<ParsedField> = Vec::new();
    for chunk in split_fields(body) {
        let span = chunk.clone().into_iter().next().map_or(Span::call_site(), |t| t.span());
        let field: FieldDef = chunk
            .to_token_iter()
            .parse()
            .map_err(|err| DeriveError::new(span, format!("could not parse field: {err}")))?;

        let raw = field.name.to_string();
        let raw = raw.strip_prefix("r#").unwrap_or(&raw);
        let mut effective = rename_all.map_or_else(|| raw.to_owned(), |rule| rule.apply(raw));
        let mut skip = false;
        for (arg, span) in form_args(&field.attrs)? {
            match arg {
                FormArg::Rename(name) => effective = name,
                FormArg::Skip => skip = true,
                FormArg::RenameAll(_) => {
                    return Err(DeriveError::new(span, "`rename_all` goes on the struct, use `rename` on fields"));
                }
            }
        }
        if skip {
            continue;
        }

        if field.ty.is_empty() {
            return Err(DeriveError::new(field.name.span(), "expected a field type"));
        }
        if fields.iter().any(|f| f.effective == effective) {
            return Err(DeriveError::new(
                field.name.span(),
                format!("duplicate form field name `{effective}`"),
            ));
        }

        fields.push(ParsedField {
            ident: field.name,
            effective,
            ty: field.ty.into_iter().collect(),
        });
    }

    Ok(ParsedStruct {
        name: def.name,
        fields,
    })
}

/// Splits a field list on commas outside angle brackets, so that
/// `HashMap<K, V>` stays in one piece.
fn split_fields(body: TokenStream) -> Vec<TokenStream> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    let mut after_dash = false;

    for tt in body {
        if let TokenTree::Punct(p) = &tt {
            match p.as_char() {
                ',' if depth == 0 => {
                    chunks.push(current.drain(..).collect());
                    after_dash = false;
                    continue;
                }
                '<' => depth += 1,
                // `->` in a fn pointer type is not a closing bracket
                '>' if !after_dash => depth = depth.saturating_sub(1),
                _ => {}
            }
            after_dash = p.as_char() == '-';
        } else {
            after_dash = false;
        }
        current.push(tt);
    }
    if !current.is_empty() {
        chunks.push(current.into_iter().collect());
    }
    chunks
}

/// Collects the arguments of every `#[form(...)]` attribute, in order.
fn form_args(attrs: &[Attribute]) -> Result<Vec<(FormArg, Span)>, DeriveError> {
    let mut args = Vec::new();
    for attr in attrs {
        let mut tokens = attr.content.0.stream().into_iter();
        let Some(TokenTree::Ident(head)) = tokens.next() else {
            continue;
        };
        if head != "form" {
            continue;
        }
        let inner = match tokens.next() {
            Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Parenthesis => g.stream(),
            _ => return Err(DeriveError::new(head.span(), "expected `#[form(...)]`")),
        };

        let mut arg = Vec::new();
        for tt in inner {
            if matches!(&tt, TokenTree::Punct(p) if p.as_char() == ',') {
                if !arg.is_empty() {
                    args.push(parse_arg(&arg)?);
                    arg.clear();
                }
            } else {
                arg.push(tt);
            }
        }
        if !arg.is_empty() {
            args.push(parse_arg(&arg)?);
        }
    }
    Ok(args)
}

fn parse_arg(tokens: &[TokenTree]) -> Result<(FormArg, Span), DeriveError> {
    let span = tokens[0].span();
    match tokens {
        [TokenTree::Ident(key)] if key == "skip" => Ok((FormArg::Skip, span)),
        [TokenTree::Ident(key), TokenTree::Punct(eq), TokenTree::Literal(lit)] if eq.as_char() == '=' => {
            let value = string_literal(lit)?;
            if key == "rename" {
                Ok((FormArg::Rename(value), span))
            } else if key == "rename_all" {
                let rule = RenameRule::parse(&value).ok_or_else(|| {
                    let known: Vec<&str> = RenameRule::ALL.iter().map(|(name, _)| *name).collect();
                    DeriveError::new(
                        lit.span(),
                        format!("unknown rename rule `{value}`, expected one of: {}", known.join(", ")),
                    )
                })?;
                Ok((FormArg::RenameAll(rule), span))
            } else {
                Err(unknown_arg(span))
            }
        }
        _ => Err(unknown_arg(span)),
    }
}

fn unknown_arg(span: Span) -> DeriveError {
    DeriveError::new(
        span,
        "unknown form attribute, expected `rename = \"...\"`, `rename_all = \"...\"` or `skip`",
    )
}

fn string_literal(lit: &Literal) -> Result<String, DeriveError> {
    let repr = lit.to_string();
    match repr.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) if !inner.contains('\\') => Ok(inner.to_owned()),
        Some(_) => Err(DeriveError::new(lit.span(), "escape sequences are not supported here")),
        None => Err(DeriveError::new(lit.span(), "expected a string literal")),
    }
}
