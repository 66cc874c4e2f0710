use survivor_shooter::inventory::*;
use survivor_shooter::shop::*;
use survivor_shooter::upgrades::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn fresh_context() -> UpgradeContext {
    UpgradeContext {
        fire_cooldown: 1.0,
        drone_level: None,
        drone_max_level: false,
        barrier_level: 0,
    }
}

fn ids(options: &[&'static UpgradeOption]) -> Vec<&'static str> {
    options.iter().map(|o| o.id).collect()
}

// ── Levelling ─────────────────────────────────────────────────────────────────

#[test]
fn first_level_at_three_exp() {
    let mut upgrades = UpgradeManager::new();
    assert!(!upgrades.add_exp(2));
    assert!(upgrades.add_exp(1));
    assert_eq!(upgrades.level, 2);
    assert_eq!(upgrades.exp, 0);
    assert_eq!(upgrades.next_exp, 4);
}

#[test]
fn five_exp_at_five_needed_levels_once() {
    let mut upgrades = UpgradeManager { level: 1, exp: 0, next_exp: 5 };
    assert!(upgrades.add_exp(5));
    assert_eq!(upgrades.level, 2);
    assert_eq!(upgrades.exp, 0);
    assert_eq!(upgrades.next_exp, 7);
    assert!(!upgrades.has_pending_level());
}

#[test]
fn next_exp_curve() {
    assert_eq!(next_exp_after(5), 7);
    assert_eq!(next_exp_after(4), 6);
    assert_eq!(next_exp_after(0), 3);
    assert_eq!(next_exp_after(1), 3);
}

#[test]
fn surplus_exp_levels_one_at_a_time() {
    let mut upgrades = UpgradeManager::new();
    assert!(upgrades.add_exp(20));
    assert_eq!(upgrades.level, 2);
    assert!(upgrades.has_pending_level());
    assert!(upgrades.consume_pending_level());
    assert_eq!(upgrades.level, 3);
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[test]
fn catalog_has_twelve_unique_ids() {
    let mut seen: Vec<&str> = CATALOG.iter().map(|o| o.id).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 12);
    assert!(find_option("barrier-range").is_some());
    assert!(find_option("nope").is_none());
}

#[test]
fn random_choices_are_distinct_and_available() {
    let ctx = fresh_context();
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let picked = ids(&random_choices(3, &ctx, &mut rng));
        assert_eq!(picked.len(), 3);
        let mut unique = picked.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
        assert!(!picked.contains(&"drone-upgrade"));
        assert!(!picked.contains(&"barrier-range"));
    }
}

#[test]
fn drone_options_follow_drone_state() {
    let mut ctx = fresh_context();
    let mut rng = seeded_rng();
    let all = ids(&random_choices(CATALOG.len(), &ctx, &mut rng));
    assert!(all.contains(&"drone"));
    assert!(!all.contains(&"drone-upgrade"));

    ctx.drone_level = Some(1);
    let all = ids(&random_choices(CATALOG.len(), &ctx, &mut rng));
    assert!(!all.contains(&"drone"));
    assert!(all.contains(&"drone-upgrade"));

    ctx.drone_level = Some(3);
    ctx.drone_max_level = true;
    let all = ids(&random_choices(CATALOG.len(), &ctx, &mut rng));
    assert!(!all.contains(&"drone-upgrade"));
}

#[test]
fn barrier_range_needs_barrier() {
    let mut ctx = fresh_context();
    ctx.barrier_level = 1;
    let all = ids(&random_choices(CATALOG.len(), &ctx, &mut seeded_rng()));
    assert!(all.contains(&"barrier-range"));
    assert!(!all.contains(&"barrier"));
}

#[test]
fn fire_rate_leaves_pool_at_floor() {
    let mut ctx = fresh_context();
    ctx.fire_cooldown = 0.2;
    let all = ids(&random_choices(CATALOG.len(), &ctx, &mut seeded_rng()));
    assert!(!all.contains(&"fire-rate"));
}

#[test]
fn choices_are_reproducible_from_seed() {
    let ctx = fresh_context();
    let a = ids(&random_choices(3, &ctx, &mut seeded_rng()));
    let b = ids(&random_choices(3, &ctx, &mut seeded_rng()));
    assert_eq!(a, b);
}

// ── Synergy ───────────────────────────────────────────────────────────────────

#[test]
fn synergy_triggers_at_threshold_once() {
    let mut synergy = Synergy::default();
    assert!(synergy.register(&[Tag::Rapid]).is_empty());
    assert!(synergy.register(&[Tag::Rapid]).is_empty());
    assert_eq!(synergy.register(&[Tag::Rapid]), vec![Tag::Rapid]);
    assert!(synergy.register(&[Tag::Rapid]).is_empty());
    assert_eq!(synergy.count(Tag::Rapid), 4);
}

#[test]
fn multi_tag_option_counts_each_tag() {
    let mut synergy = Synergy::default();
    let range = find_option("barrier-range").expect("catalog entry");
    synergy.register(range.tags);
    assert_eq!(synergy.count(Tag::Survival), 1);
    assert_eq!(synergy.count(Tag::Utility), 1);
}

#[test]
fn mobility_has_no_bonus() {
    assert!(Tag::Mobility.synergy_bonus().is_none());
    assert!(Tag::Attack.synergy_bonus().is_some());
}

#[test]
fn tag_names_parse_back() {
    for tag in Tag::ALL {
        assert_eq!(Tag::parse(tag.as_str()), Some(tag));
    }
    assert_eq!(Tag::parse("ranged"), None);
}

// ── Auto-build ────────────────────────────────────────────────────────────────

#[test]
fn auto_build_prefers_weighted_tags() {
    let options = [
        find_option("speed").expect("speed"),
        find_option("attack").expect("attack"),
        find_option("health").expect("health"),
    ];
    assert_eq!(AutoBuildMode::Attack.select(&options).map(|o| o.id), Some("attack"));
    assert_eq!(AutoBuildMode::Survival.select(&options).map(|o| o.id), Some("health"));
    assert_eq!(AutoBuildMode::Balance.select(&options).map(|o| o.id), Some("speed"));
}

#[test]
fn auto_build_ties_go_to_earliest() {
    let options = [
        find_option("health").expect("health"),
        find_option("attack").expect("attack"),
    ];
    assert_eq!(AutoBuildMode::Balance.select(&options).map(|o| o.id), Some("health"));
    assert!(AutoBuildMode::Balance.select(&[]).is_none());
}

#[test]
fn multi_tag_scores_sum() {
    let range = find_option("barrier-range").expect("catalog entry");
    // Survival 3 + Utility 1.
    assert_eq!(AutoBuildMode::Survival.score(range), 4);
}

// ── Inventory ─────────────────────────────────────────────────────────────────

#[test]
fn add_increments_and_keeps_first_name() {
    let mut inventory = Inventory::new();
    inventory.add("core", "Core", "Attack +1");
    inventory.add("core", "Renamed", "ignored");
    let entry = inventory.get("core").expect("entry");
    assert_eq!(entry.count, 2);
    assert_eq!(entry.name, "Core");
}

#[test]
fn set_overwrites_in_place() {
    let mut inventory = Inventory::new();
    inventory.add("core", "Core", "");
    inventory.set("drone", "Drone Lv.1", "");
    inventory.add("armor", "Armor", "");
    inventory.set("drone", "Drone Lv.2", "better");
    assert_eq!(inventory.len(), 3);
    assert_eq!(inventory.entries()[1].name, "Drone Lv.2");
    assert_eq!(inventory.count("drone"), 1);
}

#[test]
fn from_entries_dedups_and_floors_count() {
    let entry = |id: &str, name: &str, count| InventoryEntry {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        count,
    };
    let inventory = Inventory::from_entries(vec![
        entry("core", "Core", 0),
        entry("armor", "Armor", 2),
        entry("core", "Core v2", 3),
    ]);
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory.entries()[0].name, "Core v2");
    assert_eq!(inventory.count("core"), 3);
    assert_eq!(inventory.count("missing"), 0);
}

// ── Shop ──────────────────────────────────────────────────────────────────────

#[test]
fn shop_offers_four_distinct_items() {
    let shop = Shop::new(&mut seeded_rng());
    assert_eq!(shop.offers.len(), 4);
    let mut offered: Vec<&str> = shop.offers.iter().map(|o| o.item.id).collect();
    offered.sort();
    offered.dedup();
    assert_eq!(offered.len(), 4);
    assert!(!shop.has_update);
}

#[test]
fn shop_refresh_restocks_and_flags() {
    let mut rng = seeded_rng();
    let mut shop = Shop::new(&mut rng);
    let mut currency = 1000;
    let id = shop.offers[0].item.id;
    shop.purchase(id, &mut currency);
    shop.refresh(true, &mut rng);
    assert!(shop.offers.iter().all(|o| !o.sold));
    assert!(shop.has_update);
    shop.mark_seen();
    assert!(!shop.has_update);
}

#[test]
fn shop_purchase_deducts_cost() {
    let mut shop = Shop::new(&mut seeded_rng());
    let item = shop.offers[1].item;
    let mut currency = u64::from(item.cost);
    assert_eq!(shop.purchase(item.id, &mut currency), PurchaseOutcome::Purchased(item.effect));
    assert_eq!(currency, 0);
    assert_eq!(shop.purchase(item.id, &mut currency), PurchaseOutcome::SoldOut);
}
