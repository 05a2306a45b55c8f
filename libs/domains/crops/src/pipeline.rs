//! Shared aggregation pipeline builders
//!
//! Two read paths use these stages: the standalone crop view (one crop
//! with its city, variant → item chain and owner resolved) and the
//! owner-with-crops view used by both the supplier and user
//! repositories. The latter is a single parametrized builder so the two
//! owner collections cannot drift apart.

use mongodb::bson::{doc, Document};

/// Stages resolving a crop's city, variant (with its item) and owner,
/// projecting the raw reference ids away
pub fn crop_populate_stages() -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": "cities",
            "localField": "cityId",
            "foreignField": "_id",
            "as": "city",
        }},
        doc! { "$unwind": {
            "path": "$city",
            "preserveNullAndEmptyArrays": true,
        }},
        doc! { "$lookup": {
            "from": "variants",
            "localField": "variantId",
            "foreignField": "_id",
            "as": "variant",
        }},
        doc! { "$unwind": {
            "path": "$variant",
            "preserveNullAndEmptyArrays": true,
        }},
        doc! { "$lookup": {
            "from": "items",
            "localField": "variant.itemId",
            "foreignField": "_id",
            "as": "variant.item",
        }},
        doc! { "$unwind": {
            "path": "$variant.item",
            "preserveNullAndEmptyArrays": true,
        }},
        // The item lookup rebuilds `variant` as an empty sub-document
        // for crops stored without one; drop it so the view reads as an
        // absent variant instead.
        doc! { "$set": {
            "variant": {
                "$cond": [{ "$gt": ["$variant._id", null] }, "$variant", "$$REMOVE"],
            },
        }},
        doc! { "$lookup": {
            "from": "suppliers",
            "localField": "supplierId",
            "foreignField": "_id",
            "as": "supplier",
        }},
        doc! { "$unwind": {
            "path": "$supplier",
            "preserveNullAndEmptyArrays": true,
        }},
        doc! { "$project": {
            "cityId": 0,
            "variantId": 0,
            "supplierId": 0,
        }},
    ]
}

/// Stages assembling an owner (supplier or user) with its populated
/// crops array
///
/// The crop lookup runs first and `hasCrops` records the pre-unwind
/// count, so the final $project can collapse the left-outer-join
/// artifact (a single all-null crop row) back into an empty array.
/// `with_role` carries the user-only `role` field through the group.
pub fn owner_with_crops_stages(with_role: bool) -> Vec<Document> {
    let mut group = doc! {
        "_id": "$_id",
        "name": { "$first": "$name" },
        "surname": { "$first": "$surname" },
        "documentType": { "$first": "$documentType" },
        "documentNumber": { "$first": "$documentNumber" },
        "city": { "$first": "$city" },
        "email": { "$first": "$email" },
        "addressLine1": { "$first": "$addressLine1" },
        "phoneNumber": { "$first": "$phoneNumber" },
        "createdAt": { "$first": "$createdAt" },
        "updatedAt": { "$first": "$updatedAt" },
        "recordStatus": { "$first": "$recordStatus" },
        "hasCrops": { "$first": "$hasCrops" },
        "crops": { "$push": "$crops" },
    };
    let mut project = doc! {
        "_id": 1,
        "name": 1,
        "surname": 1,
        "documentType": 1,
        "documentNumber": 1,
        "city": 1,
        "email": 1,
        "addressLine1": 1,
        "phoneNumber": 1,
        "createdAt": 1,
        "updatedAt": 1,
        "recordStatus": 1,
        "crops": {
            "$cond": [{ "$eq": ["$hasCrops", 0] }, [], "$crops"],
        },
    };
    if with_role {
        group.insert("role", doc! { "$first": "$role" });
        project.insert("role", 1);
    }

    vec![
        doc! { "$lookup": {
            "from": "crops",
            "localField": "_id",
            "foreignField": "supplierId",
            "as": "crops",
        }},
        doc! { "$addFields": {
            "hasCrops": { "$size": { "$ifNull": ["$crops", []] } },
        }},
        doc! { "$unwind": {
            "path": "$crops",
            "preserveNullAndEmptyArrays": true,
        }},
        doc! { "$lookup": {
            "from": "variants",
            "localField": "crops.variantId",
            "foreignField": "_id",
            "as": "crops.variant",
        }},
        doc! { "$unwind": {
            "path": "$crops.variant",
            "preserveNullAndEmptyArrays": true,
        }},
        doc! { "$lookup": {
            "from": "items",
            "localField": "crops.variant.itemId",
            "foreignField": "_id",
            "as": "crops.variant.item",
        }},
        doc! { "$unwind": {
            "path": "$crops.variant.item",
            "preserveNullAndEmptyArrays": true,
        }},
        // Same empty sub-document artifact as in the standalone view,
        // one level down.
        doc! { "$set": {
            "crops.variant": {
                "$cond": [
                    { "$gt": ["$crops.variant._id", null] },
                    "$crops.variant",
                    "$$REMOVE",
                ],
            },
        }},
        doc! { "$lookup": {
            "from": "cities",
            "localField": "cityId",
            "foreignField": "_id",
            "as": "city",
        }},
        doc! { "$unwind": {
            "path": "$city",
            "preserveNullAndEmptyArrays": true,
        }},
        doc! { "$group": group },
        doc! { "$project": project },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_crop_stages_project_away_raw_reference_ids() {
        let stages = crop_populate_stages();
        let project = stages.last().unwrap().get_document("$project").unwrap();

        assert_eq!(project.get_i32("cityId").unwrap(), 0);
        assert_eq!(project.get_i32("variantId").unwrap(), 0);
        assert_eq!(project.get_i32("supplierId").unwrap(), 0);
    }

    #[test]
    fn test_crop_stages_chain_variant_to_item() {
        let stages = crop_populate_stages();
        let item_lookup = stages[4].get_document("$lookup").unwrap();

        assert_eq!(item_lookup.get_str("from").unwrap(), "items");
        assert_eq!(item_lookup.get_str("localField").unwrap(), "variant.itemId");
        assert_eq!(item_lookup.get_str("as").unwrap(), "variant.item");
    }

    #[test]
    fn test_crop_stages_preserve_missing_references() {
        for stage in crop_populate_stages() {
            if let Ok(unwind) = stage.get_document("$unwind") {
                assert_eq!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap(), true);
            }
        }
    }

    #[test]
    fn test_crop_stages_drop_the_empty_variant_left_by_the_item_join() {
        let stages = crop_populate_stages();
        let set = stages[6].get_document("$set").unwrap();
        let cond = set.get_document("variant").unwrap().get_array("$cond").unwrap();

        // Keyed on the resolved variant's _id: absent means the join
        // matched nothing and the field must go away entirely.
        let gt = cond[0].as_document().unwrap().get_array("$gt").unwrap();
        assert_eq!(gt[0], Bson::String("$variant._id".to_string()));
        assert_eq!(cond[2], Bson::String("$$REMOVE".to_string()));
    }

    #[test]
    fn test_owner_stages_drop_the_empty_variant_left_by_the_item_join() {
        let stages = owner_with_crops_stages(false);
        let set = stages[7].get_document("$set").unwrap();
        let cond = set
            .get_document("crops.variant")
            .unwrap()
            .get_array("$cond")
            .unwrap();

        let gt = cond[0].as_document().unwrap().get_array("$gt").unwrap();
        assert_eq!(gt[0], Bson::String("$crops.variant._id".to_string()));
        assert_eq!(cond[2], Bson::String("$$REMOVE".to_string()));
    }

    #[test]
    fn test_owner_stages_start_with_crop_join_and_count() {
        let stages = owner_with_crops_stages(false);

        let crops_lookup = stages[0].get_document("$lookup").unwrap();
        assert_eq!(crops_lookup.get_str("from").unwrap(), "crops");
        assert_eq!(crops_lookup.get_str("foreignField").unwrap(), "supplierId");

        // hasCrops counts before the unwind introduces the join artifact
        let add_fields = stages[1].get_document("$addFields").unwrap();
        let has_crops = add_fields.get_document("hasCrops").unwrap();
        assert!(has_crops.contains_key("$size"));
    }

    #[test]
    fn test_owner_stages_normalize_empty_crops_via_cond() {
        let stages = owner_with_crops_stages(false);
        let project = stages.last().unwrap().get_document("$project").unwrap();
        let crops = project.get_document("crops").unwrap();

        let cond = crops.get_array("$cond").unwrap();
        assert_eq!(cond.len(), 3);
        assert_eq!(cond[1], Bson::Array(vec![]));
    }

    #[test]
    fn test_owner_stages_carry_role_only_for_users() {
        let user_stages = owner_with_crops_stages(true);
        let supplier_stages = owner_with_crops_stages(false);

        let user_group_index = user_stages.len() - 2;
        let user_group = user_stages[user_group_index].get_document("$group").unwrap();
        let supplier_group = supplier_stages[user_group_index]
            .get_document("$group")
            .unwrap();

        assert!(user_group.contains_key("role"));
        assert!(!supplier_group.contains_key("role"));

        let user_project = user_stages.last().unwrap().get_document("$project").unwrap();
        let supplier_project = supplier_stages
            .last()
            .unwrap()
            .get_document("$project")
            .unwrap();
        assert!(user_project.contains_key("role"));
        assert!(!supplier_project.contains_key("role"));
    }

    #[test]
    fn test_owner_stages_never_carry_a_password_hash() {
        for stage in owner_with_crops_stages(true) {
            if let Ok(group) = stage.get_document("$group") {
                assert!(!group.contains_key("hashedPassword"));
            }
            if let Ok(project) = stage.get_document("$project") {
                assert!(!project.contains_key("hashedPassword"));
            }
        }
    }
}
