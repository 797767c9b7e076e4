use {
    serde_json::{
        Value as Json,
        json,
    },
    crate::{
        Selection,
        catalog::Fragment,
    },
};

const OVERWORLD_TOKENS: &str = "ow_tokens";
const DUNGEON_TOKENS: &str = "dungeon_tokens";
/// Dungeon entrance randomizer puts the Dodongo's Cavern scarecrow skulltula in logic via this trick.
const DUNGEON_ER_TRICK: &str = "logic_dc_scarecrow_gs";

/// Builds the settings sent to the seed generator: the base preset, overlaid with the drafted configuration data, plus the cross-setting rules.
///
/// `picks` are the picks of a non-default option. This is a pure function. Compiling its own output again changes nothing.
pub fn compile(base: &Fragment, data: &Fragment, picks: &[Selection]) -> Fragment {
    let mut settings = base.clone();
    settings.extend(data.iter().map(|(key, value)| (key.clone(), value.clone())));
    let picked = |setting: &str| picks.iter().any(|pick| pick.setting == setting);
    if picked(OVERWORLD_TOKENS) && picked(DUNGEON_TOKENS) {
        settings.insert(format!("tokensanity"), json!("all"));
    }
    if settings.get("shuffle_dungeon_entrances").and_then(Json::as_str) == Some("simple") {
        let tricks = settings.entry("allowed_tricks").or_insert_with(|| Json::Array(Vec::default()));
        if let Json::Array(tricks) = tricks {
            if !tricks.iter().any(|trick| trick.as_str() == Some(DUNGEON_ER_TRICK)) {
                tricks.push(json!(DUNGEON_ER_TRICK));
            }
        }
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(value: Json) -> Fragment {
        match value {
            Json::Object(obj) => obj,
            _ => panic!("not an object"),
        }
    }

    fn pick(setting: &str, option: &str) -> Selection {
        Selection { setting: setting.to_owned(), option: option.to_owned() }
    }

    #[test]
    fn overlay_wins_over_base() {
        let base = fragment(json!({ "bridge": "medallions", "trials": 0 }));
        let data = fragment(json!({ "bridge": "open" }));
        let settings = compile(&base, &data, &[pick("bridge", "open")]);
        assert_eq!(settings["bridge"], json!("open"));
        assert_eq!(settings["trials"], json!(0));
        assert_eq!(base["bridge"], json!("medallions"));
    }

    #[test]
    fn both_token_picks_collapse() {
        let base = fragment(json!({ "tokensanity": "off" }));
        let data = fragment(json!({ "tokensanity": "dungeons" }));
        let one = compile(&base, &data, &[pick("dungeon_tokens", "on")]);
        assert_eq!(one["tokensanity"], json!("dungeons"));
        let both = compile(&base, &data, &[pick("ow_tokens", "on"), pick("dungeon_tokens", "on")]);
        assert_eq!(both["tokensanity"], json!("all"));
    }

    #[test]
    fn dungeon_er_trick_is_added_once() {
        let base = fragment(json!({ "allowed_tricks": ["logic_fewer_tunic_requirements"] }));
        let data = fragment(json!({ "shuffle_dungeon_entrances": "simple" }));
        let picks = [pick("dungeons", "on")];
        let first = compile(&base, &data, &picks);
        assert_eq!(first["allowed_tricks"], json!(["logic_fewer_tunic_requirements", "logic_dc_scarecrow_gs"]));
        assert_eq!(compile(&base, &data, &picks), first);
        // feeding the output back in as the base must not duplicate the trick
        assert_eq!(compile(&first, &data, &picks), first);
        assert_eq!(serde_json::to_string(&compile(&first, &data, &picks)).unwrap(), serde_json::to_string(&first).unwrap());
    }

    #[test]
    fn no_trick_without_dungeon_er() {
        let base = fragment(json!({ "shuffle_dungeon_entrances": "off" }));
        let settings = compile(&base, &Fragment::default(), &[]);
        assert!(!settings.contains_key("allowed_tricks"));
    }
}
