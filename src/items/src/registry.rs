//! Item Registry: ownership, pickup detection and collection statistics

use error::ProgressionError;
use glam::Vec2;
use puzzles::PuzzleRegistry;
use save::{LoadOutcome, check_version, read_json, write_json};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::EnumCount;
use world::{ActorId, ItemId, LayerMask, PuzzleId, SceneHost};

use crate::binding::{BindingTable, StepBinding};
use crate::item::{Item, ItemKind};

/// Item document format version
pub const ITEM_DOC_VERSION: u32 = 1;

/// Running item statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatistics {
    pub total_items_added: u32,
    pub total_items_collected: u32,
    /// Items added per category, indexed by [`ItemKind::index`]
    pub items_by_type: [u32; ItemKind::COUNT],
    /// Seconds since registry start divided by items collected; 0 when none
    pub average_collection_time: f64,
}

impl ItemStatistics {
    /// Raise each counter to the saved value where the saved one is ahead
    fn merge_forward(&mut self, saved: &ItemStatistics) {
        self.total_items_added = self.total_items_added.max(saved.total_items_added);
        for (live, saved) in self.items_by_type.iter_mut().zip(saved.items_by_type) {
            *live = (*live).max(saved);
        }
        if saved.total_items_collected > self.total_items_collected {
            self.total_items_collected = saved.total_items_collected;
            self.average_collection_time = saved.average_collection_time;
        }
    }
}

/// A pickup recorded by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub item: ItemId,
    pub kind: ItemKind,
    pub actor: ActorId,
}

pub type ItemCallback = Box<dyn FnMut(ItemId)>;

/// Collaborators lent to the registry for one call. Either may be absent.
#[derive(Default)]
pub struct PickupContext<'a> {
    pub host: Option<&'a mut dyn SceneHost>,
    pub puzzles: Option<&'a mut PuzzleRegistry>,
}

impl<'a> PickupContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &'a mut dyn SceneHost) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_puzzles(mut self, puzzles: &'a mut PuzzleRegistry) -> Self {
        self.puzzles = Some(puzzles);
        self
    }
}

/// Owning collection of items
#[derive(Default)]
pub struct ItemRegistry {
    items: Vec<Item>,
    bindings: BindingTable,
    stats: ItemStatistics,
    elapsed: f64,
    on_collected: Option<ItemCallback>,
    pickups: Vec<Pickup>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an item. An item whose id is already present is rejected.
    pub fn add_item(&mut self, mut item: Item, ctx: &mut PickupContext<'_>) -> bool {
        if self.find(item.id()).is_some() {
            log::warn!("Item {} already registered, ignoring", item.id());
            return false;
        }

        if let Some(host) = ctx.host.as_deref_mut() {
            if !item.is_collected() {
                item.sync_collider(host);
            }
        }

        self.stats.total_items_added += 1;
        self.stats.items_by_type[item.kind().index()] += 1;
        log::debug!("Added {} \"{}\" ({})", item.id(), item.name(), item.kind());
        self.items.push(item);
        true
    }

    /// Drop an item and its binding. Returns false for an unknown id.
    pub fn remove_item(&mut self, id: ItemId, ctx: &mut PickupContext<'_>) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id() == id) else {
            return false;
        };

        let mut item = self.items.remove(index);
        if let Some(host) = ctx.host.as_deref_mut() {
            item.detach_collider(host);
        }
        self.bindings.unbind(id);
        true
    }

    /// Proximity pickup detection for every collectable item.
    ///
    /// Without a host there is nothing to query, so only the clock advances.
    pub fn update_all(&mut self, dt: f32, ctx: &mut PickupContext<'_>) {
        self.elapsed += f64::from(dt);

        let Some(host) = ctx.host.as_deref_mut() else {
            return;
        };

        let mut picked = Vec::new();
        for item in self.items.iter_mut().filter(|item| item.is_collectable()) {
            item.sync_collider(&mut *host);

            let Some(actor) = host.first_collider_for_bounds(&item.bounds(), item.collider(), LayerMask::PLAYER)
            else {
                continue;
            };
            if !host.is_player_capable(actor) {
                continue;
            }

            if item.pickup(actor, Some(&mut *host)) {
                picked.push(Pickup {
                    item: item.id(),
                    kind: item.kind(),
                    actor,
                });
            }
        }

        for pickup in picked {
            self.record_pickup(pickup, ctx.puzzles.as_deref_mut());
        }
    }

    /// Explicit interaction: collect regardless of position or the disabled flag.
    /// Returns false for an unknown or already-collected item.
    pub fn interact_with_item(&mut self, id: ItemId, actor: ActorId, ctx: &mut PickupContext<'_>) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            log::debug!("{} tried to interact with unknown {}", actor, id);
            return false;
        };

        if !item.pickup(actor, ctx.host.as_deref_mut()) {
            return false;
        }

        let pickup = Pickup {
            item: id,
            kind: item.kind(),
            actor,
        };
        self.record_pickup(pickup, ctx.puzzles.as_deref_mut());
        true
    }

    fn record_pickup(&mut self, pickup: Pickup, puzzles: Option<&mut PuzzleRegistry>) {
        self.stats.total_items_collected += 1;
        self.stats.average_collection_time =
            self.elapsed / f64::from(self.stats.total_items_collected);

        if let Some(callback) = self.on_collected.as_mut() {
            callback(pickup.item);
        }
        self.pickups.push(pickup);

        let Some(binding) = self.bindings.get(pickup.item) else {
            return;
        };
        match puzzles {
            Some(puzzles) => {
                let finished = puzzles.mark_step_completed(binding.puzzle, binding.step);
                log::debug!(
                    "{} completed {} step {}{}",
                    pickup.item,
                    binding.puzzle,
                    binding.step,
                    if finished { ", all steps done" } else { "" }
                );
            }
            None => log::warn!(
                "{} is bound to {} step {} but no puzzle registry was supplied",
                pickup.item,
                binding.puzzle,
                binding.step
            ),
        }
    }

    /// Insert or overwrite the binding for `item`
    pub fn bind_item_to_puzzle_step(&mut self, item: ItemId, puzzle: PuzzleId, step: usize) -> Option<StepBinding> {
        self.bindings.bind(item, puzzle, step)
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn set_item_disabled(&mut self, id: ItemId, disabled: bool) -> bool {
        self.find_mut(id).map(|item| item.set_disabled(disabled)).is_some()
    }

    pub fn collected_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.is_collected())
            .map(Item::id)
            .collect()
    }

    pub fn statistics(&self) -> &ItemStatistics {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_on_collected(&mut self, callback: impl FnMut(ItemId) + 'static) {
        self.on_collected = Some(Box::new(callback));
    }

    /// Pickups recorded since the last drain
    pub fn drain_pickups(&mut self) -> Vec<Pickup> {
        std::mem::take(&mut self.pickups)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ProgressionError> {
        let document = ItemDocument {
            version: ITEM_DOC_VERSION,
            items: self.items.iter().map(ItemEntry::from).collect(),
            statistics: self.stats.clone(),
            bindings: Some(
                self.bindings
                    .iter()
                    .map(|(item, binding)| BindingEntry {
                        item_id: item,
                        puzzle_id: binding.puzzle,
                        step_index: binding.step,
                    })
                    .collect(),
            ),
        };

        write_json(path, &document).inspect_err(|e| {
            log::warn!("Failed to save items to {:?}: {}", path, e);
        })?;
        log::info!("Saved {} items to {:?}", self.items.len(), path);
        Ok(())
    }

    /// Merge saved items onto the live ones by id. Collection only moves
    /// forward: a live collected item stays collected, a saved collected item
    /// is marked collected without firing callbacks or bindings, and the
    /// statistics counters never go down. Saved ids not yet registered are
    /// added. Live state is untouched when the document is missing or
    /// unreadable.
    pub fn load_from_file(&mut self, path: &Path, ctx: &mut PickupContext<'_>) -> Result<LoadOutcome, ProgressionError> {
        let document = match read_json::<ItemDocument>(path) {
            Ok(Some(document)) => document,
            Ok(None) => {
                log::info!("No item save at {:?}, keeping defaults", path);
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => {
                log::warn!("Failed to load items from {:?}: {}", path, e);
                return Err(e);
            }
        };
        check_version(document.version, ITEM_DOC_VERSION)
            .inspect_err(|e| log::warn!("Ignoring item save {:?}: {}", path, e))?;

        let mut host = ctx.host.as_deref_mut();
        for entry in document.items {
            if let Some(live) = self.items.iter_mut().find(|item| item.id() == entry.id) {
                live.set_disabled(entry.disabled);
                if entry.collected {
                    live.restore_collected(host.as_deref_mut());
                }
                continue;
            }

            let mut item = Item::restored(
                entry.id,
                entry.name,
                entry.kind,
                entry.position,
                entry.size,
                entry.collected,
                entry.disabled,
            );
            if let Some(host) = host.as_deref_mut() {
                if !item.is_collected() {
                    item.sync_collider(host);
                }
            }
            self.items.push(item);
        }

        if let Some(bindings) = document.bindings {
            self.bindings.clear();
            for entry in bindings {
                self.bindings.bind(entry.item_id, entry.puzzle_id, entry.step_index);
            }
        }
        self.stats.merge_forward(&document.statistics);

        log::info!("Loaded {} items from {:?}", self.items.len(), path);
        Ok(LoadOutcome::Loaded)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemDocument {
    version: u32,
    items: Vec<ItemEntry>,
    #[serde(default)]
    statistics: ItemStatistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bindings: Option<Vec<BindingEntry>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemEntry {
    id: ItemId,
    #[serde(rename = "type")]
    kind: ItemKind,
    position: Vec2,
    size: Vec2,
    collected: bool,
    #[serde(default)]
    name: String,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BindingEntry {
    item_id: ItemId,
    puzzle_id: PuzzleId,
    step_index: usize,
}

impl From<&Item> for ItemEntry {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id(),
            kind: item.kind(),
            position: item.position(),
            size: item.size(),
            collected: item.is_collected(),
            name: item.name().to_string(),
            disabled: item.is_disabled(),
        }
    }
}
