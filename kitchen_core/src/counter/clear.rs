use bevy::ecs::entity::Entity;
use tracing::debug;

use super::{hand_off, plate_ingredient, Handoff, KitchenContext};
use crate::kitchen_object::OwnershipError;

/// A plain work surface: put things down, pick them up, and assemble plates when
/// both the chef and the counter hold something.
pub fn interact(
    counter: Entity,
    chef: Entity,
    kitchen: &mut KitchenContext,
) -> Result<(), OwnershipError> {
    let Handoff::BothHolding {
        on_counter,
        in_hands,
    } = hand_off(counter, chef, kitchen.objects)?
    else {
        return Ok(());
    };

    let plated = if kitchen.objects.plate(in_hands).is_some() {
        plate_ingredient(in_hands, on_counter, kitchen)?
    } else if kitchen.objects.plate(on_counter).is_some() {
        plate_ingredient(on_counter, in_hands, kitchen)?
    } else {
        false
    };
    if !plated {
        debug!("Nothing to combine on clear counter");
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{counter::test_support::*, item::Item, kitchen_object::Holder};

    #[test]
    fn set_down_and_pick_up() {
        let mut kitchen = TestKitchen::new();
        let tomato = kitchen
            .objects
            .spawn(&kitchen.definition("Tomato"), Holder::Chef(CHEF))
            .unwrap();

        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();
        assert_eq!(kitchen.objects.held_by(Holder::Counter(COUNTER)), Some(tomato));
        assert!(!kitchen.objects.is_holding(Holder::Chef(CHEF)));

        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();
        assert_eq!(kitchen.objects.held_by(Holder::Chef(CHEF)), Some(tomato));
        assert!(!kitchen.objects.is_holding(Holder::Counter(COUNTER)));
        assert!(kitchen.events.is_empty());
    }

    #[test]
    fn empty_on_both_sides_is_noop() {
        let mut kitchen = TestKitchen::new();
        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();
        assert!(kitchen.objects.is_empty());
    }

    #[test]
    fn carried_plate_takes_ingredient_from_counter() {
        let mut kitchen = TestKitchen::new();
        let plate = kitchen
            .objects
            .spawn(&kitchen.definition("Plate"), Holder::Chef(CHEF))
            .unwrap();
        kitchen
            .objects
            .spawn(&kitchen.definition("Tomato"), Holder::Counter(COUNTER))
            .unwrap();

        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();

        assert!(!kitchen.objects.is_holding(Holder::Counter(COUNTER)));
        assert_eq!(kitchen.objects.held_by(Holder::Chef(CHEF)), Some(plate));
        assert_eq!(
            kitchen.objects.plate(plate).unwrap().ingredients(),
            &[Item::new("Tomato")]
        );
    }

    #[test]
    fn ingredient_goes_onto_plate_resting_on_counter() {
        let mut kitchen = TestKitchen::new();
        let plate = kitchen
            .objects
            .spawn(&kitchen.definition("Plate"), Holder::Counter(COUNTER))
            .unwrap();
        kitchen
            .objects
            .spawn(&kitchen.definition("Bread"), Holder::Chef(CHEF))
            .unwrap();

        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();

        assert!(!kitchen.objects.is_holding(Holder::Chef(CHEF)));
        assert!(kitchen
            .objects
            .plate(plate)
            .unwrap()
            .contains(&Item::new("Bread")));
    }

    #[test]
    fn rejected_ingredient_changes_nothing() {
        let mut kitchen = TestKitchen::new();
        let plate = kitchen
            .objects
            .spawn(&kitchen.definition("Plate"), Holder::Chef(CHEF))
            .unwrap();
        let raw = kitchen
            .objects
            .spawn(
                &kitchen.definition("Meat patty uncooked"),
                Holder::Counter(COUNTER),
            )
            .unwrap();

        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();

        assert_eq!(kitchen.objects.held_by(Holder::Chef(CHEF)), Some(plate));
        assert_eq!(kitchen.objects.held_by(Holder::Counter(COUNTER)), Some(raw));
        assert!(kitchen.objects.plate(plate).unwrap().is_empty());
        assert!(kitchen.events.is_empty());
    }

    #[test]
    fn two_plain_objects_do_not_combine() {
        let mut kitchen = TestKitchen::new();
        kitchen
            .objects
            .spawn(&kitchen.definition("Tomato"), Holder::Chef(CHEF))
            .unwrap();
        kitchen
            .objects
            .spawn(&kitchen.definition("Bread"), Holder::Counter(COUNTER))
            .unwrap();

        interact(COUNTER, CHEF, &mut kitchen.context()).unwrap();

        assert_eq!(kitchen.objects.len(), 2);
        assert!(kitchen.events.is_empty());
    }
}
