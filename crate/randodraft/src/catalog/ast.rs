use {
    syn::{
        *,
        parse::{
            Parse,
            ParseStream,
        },
    },
    super::*,
};

impl Parse for SettingPool {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut major = None;
        let mut minor = None;
        while !input.is_empty() {
            let field_name = input.parse::<Ident>()?;
            input.parse::<Token![:]>()?;
            let tier = match &*field_name.to_string() {
                "major" => &mut major,
                "minor" => &mut minor,
                field_name => return Err(input.error(format!("unexpected catalog field: {field_name}"))),
            };
            let mut settings = BTreeMap::default();
            let content;
            braced!(content in input);
            for setting in content.parse_terminated(ParseSetting::parse, Token![,])? {
                let key = setting.key.clone();
                if settings.insert(key.clone(), setting.into_setting(input)?).is_some() {
                    return Err(input.error(format!("{field_name} tier defines multiple settings named {key}")))
                }
            }
            if tier.replace(settings).is_some() {
                return Err(input.error(format!("{field_name} tier specified multiple times")))
            }
        }
        Self::new(major.unwrap_or_default(), minor.unwrap_or_default()).map_err(|e| input.error(e))
    }
}

struct ParseSetting {
    key: String,
    name: Option<String>,
    default: Option<ParseOption>,
    other: Vec<ParseOption>,
}

impl ParseSetting {
    fn into_setting(self, input: ParseStream<'_>) -> Result<Setting> {
        let Self { key, name, default, other } = self;
        let default = default.ok_or_else(|| input.error(format!("missing default option in setting {key}")))?;
        let mut options = vec![default.into_option()];
        for option in other {
            if options.iter().any(|existing| existing.key == option.key) {
                return Err(input.error(format!("setting {key} defines multiple options named {:?}", option.key)))
            }
            options.push(option.into_option());
        }
        let default = options.remove(0);
        Ok(Setting {
            name: name.unwrap_or_else(|| capitalize(&key)),
            other: options,
            key, default,
        })
    }
}

impl Parse for ParseSetting {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        // commands are matched case-insensitively against lowercase keys
        let key = input.parse::<Ident>()?.to_string().to_lowercase();
        input.parse::<Token![:]>()?;
        let mut name = None;
        let mut default = None;
        let mut other = Vec::default();
        let content;
        braced!(content in input);
        for item in content.parse_terminated(SettingItem::parse, Token![,])? {
            match item {
                SettingItem::Name(new_name) => if name.replace(new_name).is_some() {
                    return Err(input.error("name specified multiple times"))
                },
                SettingItem::Default(option) => if default.replace(option).is_some() {
                    return Err(input.error("default specified multiple times"))
                },
                SettingItem::Other(option) => other.push(option),
            }
        }
        Ok(Self { key, name, default, other })
    }
}

enum SettingItem {
    Name(String),
    Default(ParseOption),
    Other(ParseOption),
}

impl Parse for SettingItem {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let lookahead = input.lookahead1();
        Ok(if lookahead.peek(Ident) {
            let field_name = input.parse::<Ident>()?;
            input.parse::<Token![:]>()?;
            match &*field_name.to_string() {
                "name" => Self::Name(input.parse::<LitStr>()?.value()),
                "default" => Self::Default(input.parse()?),
                field_name => return Err(input.error(format!("unexpected setting field: {field_name}"))),
            }
        } else if lookahead.peek(LitStr) {
            Self::Other(input.parse()?)
        } else {
            return Err(lookahead.error())
        })
    }
}

/// `"key" ("Label") => { fragment }`, the label being optional.
struct ParseOption {
    key: String,
    label: Option<String>,
    data: Fragment,
}

impl ParseOption {
    fn into_option(self) -> DraftOption {
        let Self { key, label, data } = self;
        DraftOption {
            label: label.unwrap_or_else(|| capitalize(&key)),
            key, data,
        }
    }
}

impl Parse for ParseOption {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let key = input.parse::<LitStr>()?.value().to_lowercase();
        let label = if input.peek(token::Paren) {
            let content;
            parenthesized!(content in input);
            Some(content.parse::<LitStr>()?.value())
        } else {
            None
        };
        input.parse::<Token![=>]>()?;
        let Value(value) = input.parse()?;
        let Json::Object(data) = value else {
            return Err(input.error(format!("option {key:?} must map to an object of settings")))
        };
        Ok(Self { key, label, data })
    }
}

struct Value(Json);

impl Parse for Value {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let lookahead = input.lookahead1();
        Ok(Self(if lookahead.peek(LitBool) {
            Json::Bool(input.parse::<LitBool>()?.value)
        } else if lookahead.peek(LitInt) {
            let lit = input.parse::<LitInt>()?;
            Json::Number(lit.base10_parse::<u64>()?.into())
        } else if lookahead.peek(LitStr) {
            Json::String(input.parse::<LitStr>()?.value())
        } else if lookahead.peek(token::Brace) {
            let mut obj = Fragment::default();
            let content;
            braced!(content in input);
            for Entry { name, value } in content.parse_terminated(Entry::parse, Token![,])? {
                if obj.insert(name.clone(), value).is_some() {
                    return Err(input.error(format!("fragment defines multiple entries named {name:?}")))
                }
            }
            Json::Object(obj)
        } else if lookahead.peek(token::Bracket) {
            let content;
            bracketed!(content in input);
            Json::Array(content.parse_terminated(Value::parse, Token![,])?.into_iter().map(|Value(value)| value).collect())
        } else {
            return Err(lookahead.error())
        }))
    }
}

struct Entry {
    name: String,
    value: Json,
}

impl Parse for Entry {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let name = input.parse::<LitStr>()?.value();
        input.parse::<Token![:]>()?;
        let Value(value) = input.parse()?;
        Ok(Self { name, value })
    }
}
