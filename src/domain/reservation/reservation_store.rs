use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::domain::reservation::reservation::Reservation;
use crate::domain::reservation::reservation_id::ReservationId;

new_key_type! {
    pub struct ReservationKey;
}

/// Storage for every reservation a flight network has accepted.
#[derive(Debug, Default)]
pub struct ReservationStore {
    /// Reservation Storage.
    slots: SlotMap<ReservationKey, Reservation>,

    /// Lookup of the internal key by the public reservation id.
    id_index: HashMap<ReservationId, ReservationKey>,

    /// Reservation ids per customer email, in booking order.
    customer_index: HashMap<String, Vec<ReservationId>>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reservation and indexes it by id and, if it has one, by customer email.
    ///
    /// # Returns
    /// The public id of the stored reservation.
    pub fn add(&mut self, reservation: Reservation) -> ReservationId {
        let id = reservation.id();
        let customer_email = reservation.customer_email().to_string();

        let key = self.slots.insert(reservation);
        self.id_index.insert(id, key);

        if !customer_email.is_empty() {
            self.customer_index.entry(customer_email).or_default().push(id);
        }

        id
    }

    pub fn get(&self, id: ReservationId) -> Option<&Reservation> {
        let key = self.id_index.get(&id)?;
        self.slots.get(*key)
    }

    pub fn get_mut(&mut self, id: ReservationId) -> Option<&mut Reservation> {
        let key = self.id_index.get(&id)?;
        self.slots.get_mut(*key)
    }

    pub fn contains(&self, id: ReservationId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Reservations made under `customer_email`, oldest first.
    pub fn by_customer(&self, customer_email: &str) -> Vec<&Reservation> {
        self.customer_index
            .get(customer_email)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Every reservation ordered by id.
    pub fn all(&self) -> Vec<&Reservation> {
        let mut reservations: Vec<&Reservation> = self.slots.values().collect();
        reservations.sort_by_key(|reservation| reservation.id());
        reservations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
