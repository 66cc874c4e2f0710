//! Currency shop: a fixed catalog and a rotating four-item offer.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::SHOP_OFFER_SIZE;
use crate::effect::Effect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u32,
    pub effect: Effect,
}

pub const SHOP_CATALOG: [ShopItem; 6] = [
    ShopItem {
        id: "shop-attack",
        name: "Sharpened Rounds",
        description: "Attack +1",
        cost: 25,
        effect: Effect::IncreaseAttack,
    },
    ShopItem {
        id: "shop-rapid",
        name: "Hair Trigger",
        description: "Fire cooldown -0.1s",
        cost: 30,
        effect: Effect::ImproveFireRate,
    },
    ShopItem {
        id: "shop-hp",
        name: "Heart Container",
        description: "Max HP +2",
        cost: 28,
        effect: Effect::IncreaseMaxHealth,
    },
    ShopItem {
        id: "shop-speed",
        name: "Light Boots",
        description: "Move speed +10%",
        cost: 22,
        effect: Effect::IncreaseSpeed,
    },
    ShopItem {
        id: "shop-projectile",
        name: "Split Barrel",
        description: "Projectiles +1",
        cost: 35,
        effect: Effect::IncreaseProjectileCount,
    },
    ShopItem {
        id: "shop-drone",
        name: "Drone Parts",
        description: "Drone upgrade",
        cost: 40,
        effect: Effect::UpgradeDrone,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopOffer {
    pub item: ShopItem,
    pub sold: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Currency has been deducted; the caller applies the effect.
    Purchased(Effect),
    SoldOut,
    InsufficientFunds,
    NotOffered,
}

#[derive(Clone, Debug, Default)]
pub struct Shop {
    pub offers: Vec<ShopOffer>,
    /// Set when the stock rotated since the player last looked.
    pub has_update: bool,
}

impl Shop {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut shop = Self::default();
        shop.refresh(false, rng);
        shop
    }

    pub fn refresh(&mut self, notify: bool, rng: &mut impl Rng) {
        let mut stock = SHOP_CATALOG.to_vec();
        stock.shuffle(rng);
        self.offers = stock
            .into_iter()
            .take(SHOP_OFFER_SIZE)
            .map(|item| ShopOffer { item, sold: false })
            .collect();
        if notify {
            self.has_update = true;
        }
    }

    pub fn mark_seen(&mut self) {
        self.has_update = false;
    }

    /// Deducts the cost from `currency` on success.
    pub fn purchase(&mut self, id: &str, currency: &mut u64) -> PurchaseOutcome {
        let Some(offer) = self.offers.iter_mut().find(|offer| offer.item.id == id) else {
            return PurchaseOutcome::NotOffered;
        };
        if offer.sold {
            return PurchaseOutcome::SoldOut;
        }
        let cost = u64::from(offer.item.cost);
        if *currency < cost {
            return PurchaseOutcome::InsufficientFunds;
        }
        *currency -= cost;
        offer.sold = true;
        PurchaseOutcome::Purchased(offer.item.effect)
    }
}
