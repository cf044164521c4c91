//! Formation probe over terrain + reservations.

use mo_core::Vec3;
use mo_formation::SlotProbe;
use mo_nav::{NavFilter, TerrainNav};
use mo_reserve::ReservationRegistry;

pub(crate) struct WorldProbe<'a, T: ?Sized> {
    pub terrain:  &'a T,
    pub registry: &'a ReservationRegistry,
    pub filter:   NavFilter,
}

impl<T: TerrainNav + ?Sized> SlotProbe for WorldProbe<'_, T> {
    fn is_free(&self, position: Vec3, radius: f32) -> bool {
        self.terrain.is_disc_clear(position, radius, self.filter)
            && self.registry.is_free(position, radius, &[])
    }

    fn ground_height(&self, position: Vec3) -> Option<f32> {
        self.terrain.sample_height(position)
    }
}
