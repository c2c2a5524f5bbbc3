use crate::shared::*;

/// Populate the CropCatalog with every crop and the seed item that grows it.
///
/// Growth is measured in watered minutes. A tile stays watered for 600
/// minutes, so anything above that needs a second watering.
pub fn populate_crops(catalog: &mut CropCatalog) {
    let crops = [
        // (id, name, watered minutes, harvest yield)
        ("turnip", "Turnip", 240, 1),
        ("radish", "Radish", 180, 1),
        ("carrot", "Carrot", 300, 2),
        ("potato", "Potato", 360, 3),
        ("wheat", "Wheat", 420, 2),
        ("strawberry", "Strawberry", 480, 4),
        ("tomato", "Tomato", 660, 3),
        ("cauliflower", "Cauliflower", 720, 1),
        ("pumpkin", "Pumpkin", 900, 1),
    ];

    for (id, name, minutes, harvest_yield) in crops {
        catalog.insert_crop(CropDef {
            id: id.into(),
            name: name.into(),
            growth_duration_minutes: minutes,
            harvest_item: id.into(),
            harvest_yield,
        });
        catalog.insert_seed(SeedDef {
            item_id: format!("{}_seeds", id),
            crop_id: id.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_seed_resolves_to_a_crop() {
        let mut catalog = CropCatalog::default();
        populate_crops(&mut catalog);
        assert_eq!(catalog.seeds.len(), catalog.crops.len());
        for seed in catalog.seeds.keys() {
            assert!(catalog.crop_for_seed(seed).is_some(), "{seed} has no crop");
        }
        assert!(catalog.crop_for_seed("turnip").is_none());
    }

    #[test]
    fn test_crops_have_positive_duration_and_yield() {
        let mut catalog = CropCatalog::default();
        populate_crops(&mut catalog);
        for crop in catalog.crops.values() {
            assert!(crop.growth_duration_minutes > 0, "{}", crop.id);
            assert!(crop.harvest_yield > 0, "{}", crop.id);
        }
    }
}
