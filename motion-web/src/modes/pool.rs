//! Fixed-capacity projectile pool
//!
//! Projectiles are allocated once and cycle between "available" (on the free
//! list) and "in flight". A slot is reset before it goes back to the free list,
//! so available + in flight always equals capacity.

use super::scene::{EntityId, EntityIds, Transform, Vec3};

#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Accumulated spin (visual only)
    pub rotation: Vec3,
    active: bool,
}

impl Projectile {
    fn new(id: EntityId) -> Self {
        Self {
            id,
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            rotation: Vec3::zeros(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Launch from `start` with the given velocity
    pub fn launch(&mut self, start: Vec3, velocity: Vec3) {
        self.position = start;
        self.velocity = velocity;
        self.rotation = Vec3::zeros();
        self.active = true;
    }

    /// Semi-implicit Euler step under constant vertical acceleration
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.velocity = Vec3::zeros();
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
        }
    }
}

pub struct ProjectilePool {
    slots: Vec<Projectile>,
    /// Indices of available slots (stack)
    free: Vec<usize>,
    /// Indices of slots in flight, in launch order
    in_flight: Vec<usize>,
}

impl ProjectilePool {
    pub fn new(capacity: usize, ids: &mut EntityIds) -> Self {
        let slots: Vec<Projectile> = (0..capacity).map(|_| Projectile::new(ids.next())).collect();
        // Reverse so the first slot is handed out first
        let free = (0..capacity).rev().collect();
        Self {
            slots,
            free,
            in_flight: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Take an available projectile and launch it, `None` when exhausted
    pub fn fire(&mut self, start: Vec3, velocity: Vec3) -> Option<&mut Projectile> {
        let index = self.free.pop()?;
        self.in_flight.push(index);
        let projectile = &mut self.slots[index];
        projectile.launch(start, velocity);
        Some(projectile)
    }

    /// Reset a projectile and return it to the free list
    pub fn release(&mut self, id: EntityId) -> bool {
        let Some(pos) = self.in_flight.iter().position(|&i| self.slots[i].id == id) else {
            return false;
        };
        let index = self.in_flight.remove(pos);
        self.slots[index].reset();
        self.free.push(index);
        true
    }

    /// Return every in-flight projectile to the pool
    pub fn release_all(&mut self) {
        for index in self.in_flight.drain(..) {
            self.slots[index].reset();
            self.free.push(index);
        }
    }

    pub fn flying(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.in_flight.iter().map(move |&i| &self.slots[i])
    }

    pub fn flying_mut(&mut self) -> impl Iterator<Item = &mut Projectile> + '_ {
        let in_flight = &self.in_flight;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| in_flight.contains(i))
            .map(|(_, p)| p)
    }

    pub fn all(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.slots.iter()
    }

    pub fn get(&self, id: EntityId) -> Option<&Projectile> {
        self.slots.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModeKind;
    use proptest::prelude::*;

    fn pool(capacity: usize) -> ProjectilePool {
        ProjectilePool::new(capacity, &mut EntityIds::new(ModeKind::Shooting))
    }

    #[test]
    fn exhausted_pool_ignores_fire() {
        let mut pool = pool(2);
        assert!(pool.fire(Vec3::zeros(), Vec3::x()).is_some());
        assert!(pool.fire(Vec3::zeros(), Vec3::x()).is_some());
        assert!(pool.fire(Vec3::zeros(), Vec3::x()).is_none());
        assert_eq!(pool.in_flight(), 2);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn released_projectile_is_reset() {
        let mut pool = pool(1);
        let id = pool.fire(Vec3::zeros(), Vec3::new(0.0, 0.0, -20.0)).map(|p| p.id).unwrap();
        assert!(pool.release(id));
        assert!(!pool.release(id));

        let p = pool.get(id).unwrap();
        assert!(!p.is_active());
        assert_eq!(p.velocity, Vec3::zeros());
    }

    #[test]
    fn integrate_applies_gravity_before_position() {
        let mut pool = pool(1);
        let p = pool.fire(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 4.0, 0.0)).unwrap();
        p.integrate(0.5, -9.8);
        assert!((p.velocity.y - (4.0 - 4.9)).abs() < 1e-5);
        assert!((p.position.y - (2.0 + (4.0 - 4.9) * 0.5)).abs() < 1e-5);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Fire,
        ReleaseOldest,
        ReleaseAll,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Fire), Just(Op::ReleaseOldest), Just(Op::ReleaseAll)]
    }

    proptest! {
        #[test]
        fn available_plus_in_flight_is_constant(ops in prop::collection::vec(op(), 0..64)) {
            let mut pool = pool(10);
            for op in ops {
                match op {
                    Op::Fire => {
                        pool.fire(Vec3::zeros(), Vec3::z());
                    }
                    Op::ReleaseOldest => {
                        let oldest = pool.flying().next().map(|p| p.id);
                        if let Some(id) = oldest {
                            pool.release(id);
                        }
                    }
                    Op::ReleaseAll => pool.release_all(),
                }
                prop_assert_eq!(pool.available() + pool.in_flight(), pool.capacity());
                prop_assert_eq!(pool.flying().filter(|p| p.is_active()).count(), pool.in_flight());
            }
        }
    }
}
