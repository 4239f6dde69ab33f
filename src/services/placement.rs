use serde::Serialize;

use crate::models::school::Person;

/// Slot layout for the public administration display: principal in the
/// center, the two vice principals on either side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationSlots {
    pub principal: Option<Person>,
    pub vice_principal_administration: Option<Person>,
    pub vice_principal_institution: Option<Person>,
}

/// Presentation heuristic: assign people to slots by case-insensitive
/// substring match on their free-text role. First match wins per slot;
/// a "vice" role that names neither wing fills whichever side is empty.
pub fn assign_slots(people: &[Person]) -> AdministrationSlots {
    let mut principal: Option<&Person> = None;
    let mut vp_admin: Option<&Person> = None;
    let mut vp_institution: Option<&Person> = None;

    for person in people {
        let role = person.role.to_lowercase();

        if principal.is_none() && role.contains("principal") && !role.contains("vice") {
            principal = Some(person);
            continue;
        }
        if vp_admin.is_none() && role.contains("vice") && role.contains("admin") {
            vp_admin = Some(person);
            continue;
        }
        if vp_institution.is_none() && role.contains("vice") && role.contains("institution") {
            vp_institution = Some(person);
            continue;
        }
        if role.contains("vice") {
            if vp_admin.is_none() {
                vp_admin = Some(person);
            } else if vp_institution.is_none() {
                vp_institution = Some(person);
            }
        }
    }

    // No non-vice principal: fall back to anyone whose role mentions it.
    if principal.is_none() {
        principal = people
            .iter()
            .find(|p| p.role.to_lowercase().contains("principal"));
    }

    AdministrationSlots {
        principal: principal.cloned(),
        vice_principal_administration: vp_admin.cloned(),
        vice_principal_institution: vp_institution.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: i64, name: &str, role: &str) -> Person {
        Person {
            id,
            school_id: "1".into(),
            name: name.into(),
            role: role.into(),
            bio: None,
            image: None,
            display_order: id as i32,
        }
    }

    #[test]
    fn canonical_roles_land_in_their_slots() {
        let people = vec![
            person(1, "Sheikh Musa", "Principal"),
            person(2, "Hawa Freeman", "Vice Principal for Administration"),
            person(3, "Omaru Kallon", "Vice Principal for Institution"),
        ];
        let slots = assign_slots(&people);
        assert_eq!(slots.principal.unwrap().id, 1);
        assert_eq!(slots.vice_principal_administration.unwrap().id, 2);
        assert_eq!(slots.vice_principal_institution.unwrap().id, 3);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let people = vec![
            person(1, "A", "SCHOOL PRINCIPAL"),
            person(2, "B", "vice-principal (administrative affairs)"),
        ];
        let slots = assign_slots(&people);
        assert_eq!(slots.principal.unwrap().id, 1);
        assert_eq!(slots.vice_principal_administration.unwrap().id, 2);
        assert!(slots.vice_principal_institution.is_none());
    }

    #[test]
    fn unmatched_vice_fills_empty_slots_in_order() {
        let people = vec![
            person(1, "A", "Vice Principal"),
            person(2, "B", "Vice Principal"),
        ];
        let slots = assign_slots(&people);
        assert_eq!(slots.vice_principal_administration.unwrap().id, 1);
        assert_eq!(slots.vice_principal_institution.unwrap().id, 2);
    }

    #[test]
    fn vice_principal_stands_in_when_no_principal_exists() {
        let people = vec![person(1, "A", "Vice Principal for Institution")];
        let slots = assign_slots(&people);
        // Fills the right wing and, lacking anyone else, the center too.
        assert_eq!(slots.principal.as_ref().unwrap().id, 1);
        assert_eq!(slots.vice_principal_institution.unwrap().id, 1);
    }

    #[test]
    fn first_match_wins_per_slot() {
        let people = vec![
            person(1, "A", "Principal"),
            person(2, "B", "Principal Emeritus"),
        ];
        let slots = assign_slots(&people);
        assert_eq!(slots.principal.unwrap().id, 1);
    }

    #[test]
    fn unrelated_roles_leave_slots_empty() {
        let people = vec![person(1, "A", "Registrar"), person(2, "B", "Imam")];
        let slots = assign_slots(&people);
        assert!(slots.principal.is_none());
        assert!(slots.vice_principal_administration.is_none());
        assert!(slots.vice_principal_institution.is_none());
    }

    #[test]
    fn empty_roster_yields_empty_slots() {
        let slots = assign_slots(&[]);
        assert!(slots.principal.is_none());
    }
}
