use alloc::vec::Vec;

/// Slot storage with stable indices.
///
/// Removed slots are recycled through a free list. Each slot carries a
/// generation that advances on every removal, so an `(index, generation)`
/// pair names one particular occupancy and can never alias a later tenant
/// of the same slot.

pub(crate) struct Slab<T> {
  slots: Vec<Slot<T>>,
  free: Vec<u32>,
}

struct Slot<T> {
  generation: u32,
  value: Option<T>,
}

impl<T> Slab<T> {
  pub(crate) const fn new() -> Self {
    Self { slots: Vec::new(), free: Vec::new() }
  }

  /// Stores `value` and returns its `(index, generation)` pair.

  pub(crate) fn insert(&mut self, value: T) -> (u32, u32) {
    if let Some(index) = self.free.pop() {
      let slot = &mut self.slots[index as usize];
      slot.value = Some(value);
      return (index, slot.generation);
    }

    assert!(self.slots.len() < u32::MAX as usize, "slink: slot index overflow");

    let index = self.slots.len() as u32;
    self.slots.push(Slot { generation: 0, value: Some(value) });
    (index, 0)
  }

  /// Vacates `index` and returns its value. The slot's generation advances,
  /// invalidating every outstanding pair that named it.

  pub(crate) fn remove(&mut self, index: u32) -> Option<T> {
    let slot = self.slots.get_mut(index as usize)?;
    let value = slot.value.take()?;
    slot.generation = slot.generation.wrapping_add(1);
    self.free.push(index);
    Some(value)
  }

  /// Does `(index, generation)` name a live occupancy?

  #[inline(always)]
  pub(crate) fn contains(&self, index: u32, generation: u32) -> bool {
    match self.slots.get(index as usize) {
      Some(slot) => slot.generation == generation && slot.value.is_some(),
      None => false,
    }
  }

  /// The current generation of `index`, if the slot is occupied.

  #[inline(always)]
  pub(crate) fn generation(&self, index: u32) -> Option<u32> {
    let slot = self.slots.get(index as usize)?;
    if slot.value.is_none() { return None; }
    Some(slot.generation)
  }

  #[inline(always)]
  pub(crate) fn get(&self, index: u32, generation: u32) -> Option<&T> {
    let slot = self.slots.get(index as usize)?;
    if slot.generation != generation { return None; }
    slot.value.as_ref()
  }

  #[inline(always)]
  pub(crate) fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
    let slot = self.slots.get_mut(index as usize)?;
    if slot.generation != generation { return None; }
    slot.value.as_mut()
  }

  /// Access without a generation check, for walking links the container
  /// itself maintains.

  #[inline(always)]
  pub(crate) fn get_raw(&self, index: u32) -> Option<&T> {
    self.slots.get(index as usize)?.value.as_ref()
  }

  #[inline(always)]
  pub(crate) fn get_raw_mut(&mut self, index: u32) -> Option<&mut T> {
    self.slots.get_mut(index as usize)?.value.as_mut()
  }

  /// Vacates every slot. Generations of occupied slots advance, so all
  /// outstanding pairs are invalidated; the free list is rebuilt.

  pub(crate) fn clear(&mut self) {
    self.free.clear();
    for (index, slot) in self.slots.iter_mut().enumerate() {
      if slot.value.take().is_some() {
        slot.generation = slot.generation.wrapping_add(1);
      }
      self.free.push(index as u32);
    }
  }
}
