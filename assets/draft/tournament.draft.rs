// Draft pool for tournament races, split into major settings (drafted first) and minor settings.
// Option keys follow what players type after `!pick <setting>`.

major: {
    bridge: {
        name: "Rainbow Bridge",
        default: "meds" ("6 Medallions") => { "bridge": "medallions" },
        "open" ("Open bridge, 6 med GCBK") => { "bridge": "open", "shuffle_ganon_bosskey": "medallions" },
    },
    deku: {
        name: "Kokiri Forest",
        default: "closed" ("Closed Deku") => { "open_forest": "closed_deku" },
        "open" ("Open Forest") => { "open_forest": "open" },
    },
    interiors: {
        name: "Indoor Entrance Randomizer",
        default: "off" ("Disabled") => { "shuffle_interior_entrances": "off" },
        "on" ("Enabled") => { "shuffle_interior_entrances": "all" },
    },
    dungeons: {
        name: "Dungeon Entrance Randomizer",
        default: "off" ("Disabled") => { "shuffle_dungeon_entrances": "off" },
        "on" ("Simple (no Ganon's Castle)") => { "shuffle_dungeon_entrances": "simple" },
    },
    grottos: {
        name: "Grotto Entrance Randomizer",
        default: "off" ("Disabled") => { "shuffle_grotto_entrances": false },
        "on" ("Enabled") => { "shuffle_grotto_entrances": true },
    },
    shops: {
        name: "Shopsanity",
        default: "off" ("Disabled") => { "shopsanity": "off" },
        "on" ("4 items, random prices") => { "shopsanity": 4, "start_with_rupees": true },
    },
    ow_tokens: {
        name: "Overworld Tokens",
        default: "off" ("Vanilla") => { "tokensanity": "off" },
        "on" ("Shuffled") => { "tokensanity": "overworld" },
    },
    dungeon_tokens: {
        name: "Dungeon Tokens",
        default: "off" ("Vanilla") => { "tokensanity": "off" },
        "on" ("Shuffled") => { "tokensanity": "dungeons" },
    },
    scrubs: {
        name: "Scrub Shuffle",
        default: "off" ("Disabled") => { "shuffle_scrubs": "off" },
        "on" ("Enabled, affordable prices") => { "shuffle_scrubs": "low" },
    },
    keys: {
        name: "Small Keys",
        default: "dungeon" ("Own dungeon") => { "shuffle_smallkeys": "dungeon", "shuffle_bosskeys": "dungeon" },
        "keysy" ("Keysy (dungeon small keys and boss keys removed)") => { "shuffle_smallkeys": "remove", "shuffle_bosskeys": "remove" },
        "anywhere" ("Keyrings anywhere (include Boss Keys)") => { "shuffle_smallkeys": "keysanity", "key_rings_choice": "all", "keyring_give_bk": true },
    },
    required_only: {
        name: "Reachable Locations",
        default: "off" ("All locations") => { "reachable_locations": "all" },
        "on" ("Required Only (aka Beatable Only)") => { "reachable_locations": "beatable" },
    },
    fountain: {
        name: "Zora's Fountain",
        default: "closed" ("Closed Fountain") => { "zora_fountain": "closed" },
        "open" ("Open Fountain") => { "zora_fountain": "open" },
    },
    cows: {
        name: "Cowsanity",
        default: "off" ("Disabled") => { "shuffle_cows": false },
        "on" ("Enabled") => { "shuffle_cows": true },
    },
    gerudo_card: {
        name: "Shuffle Gerudo Card",
        default: "off" ("Disabled") => { "shuffle_gerudo_card": false },
        "on" ("Enabled") => { "shuffle_gerudo_card": true },
    },
    trials: {
        name: "Ganon's Trials",
        default: "off" ("No Trials") => { "trials": 0 },
        "on" ("3 Trials") => { "trials": 3 },
    },
}

minor: {
    starting_age: {
        name: "Starting Age",
        default: "random" ("Random") => { "starting_age": "random" },
        "child" ("Child") => { "starting_age": "child" },
        "adult" ("Adult") => { "starting_age": "adult" },
    },
    random_spawns: {
        name: "Random Spawns",
        default: "off" ("Disabled") => { "spawn_positions": [] },
        "on" ("Enabled") => { "spawn_positions": ["child", "adult"] },
    },
    consumables: {
        name: "Start with Consumables",
        default: "startwith" ("Enabled") => { "start_with_consumables": true },
        "none" ("Disabled") => { "start_with_consumables": false },
    },
    rupees: {
        name: "Start with max Rupees",
        default: "none" ("Disabled") => { "start_with_rupees": false },
        "startwith" ("Enabled") => { "start_with_rupees": true },
    },
    cuccos: {
        name: "Anju's Chickens",
        default: "7" ("7 Cuccos") => { "chicken_count": 7 },
        "1" ("1 Cucco") => { "chicken_count": 1 },
    },
    free_scarecrow: {
        name: "Free Scarecrow",
        default: "off" ("Disabled") => { "free_scarecrow": false },
        "on" ("Enabled") => { "free_scarecrow": true },
    },
    camc: {
        name: "Chest Appearance Matches Contents",
        default: "on" ("Both size and texture") => { "correct_chest_appearances": "both" },
        "off" ("Disabled") => { "correct_chest_appearances": "off" },
    },
    mask_quest: {
        name: "Mask Quest",
        default: "default" ("Vanilla") => { "complete_mask_quest": false },
        "complete" ("Complete, fast Bunny Hood disabled") => { "complete_mask_quest": true, "fast_bunny_hood": false },
    },
    blue_fire_arrows: {
        name: "Blue Fire Arrows",
        default: "off" ("Disabled") => { "blue_fire_arrows": false },
        "on" ("Enabled") => { "blue_fire_arrows": true },
    },
    owl_warps: {
        name: "Random Owl Warps",
        default: "vanilla" ("Vanilla") => { "owl_drops": false },
        "random" ("Enabled") => { "owl_drops": true },
    },
    song_warps: {
        name: "Random Warp Song Destinations",
        default: "vanilla" ("Vanilla") => { "warp_songs": false },
        "random" ("Enabled") => { "warp_songs": true },
    },
    shuffle_beans: {
        name: "Shuffle Magic Beans",
        default: "off" ("Disabled") => { "shuffle_beans": false },
        "on" ("Enabled") => { "shuffle_beans": true },
    },
    expensive_merchants: {
        name: "Shuffle Expensive Merchants",
        default: "off" ("Disabled") => { "shuffle_expensive_merchants": false },
        "on" ("Enabled") => { "shuffle_expensive_merchants": true },
    },
    beans_planted: {
        name: "Pre-planted Magic Beans",
        default: "off" ("Disabled") => { "plant_beans": false },
        "on" ("Enabled") => { "plant_beans": true },
    },
    door_of_time: {
        name: "Door of Time",
        default: "open" ("Open") => { "open_door_of_time": true },
        "closed" ("Closed") => { "open_door_of_time": false },
    },
    bombchus_in_logic: {
        name: "Bombchu Bag and Drops",
        default: "off" ("Disabled") => { "free_bombchu_drops": false },
        "on" ("Enabled (Bombchus in logic)") => { "free_bombchu_drops": true },
    },
}
