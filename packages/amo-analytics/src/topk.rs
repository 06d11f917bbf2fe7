use std::cmp::Ordering;

pub const LARGEST_FILES_CAPACITY: usize = 10;

/// Fixed-capacity collection kept in `order`; the tail past capacity is dropped on insert.
#[derive(Debug, Clone)]
pub struct BoundedTopK<T> {
	items: Vec<T>,
	capacity: usize,
	order: fn(&T, &T) -> Ordering,
}
impl<T> BoundedTopK<T> {
	pub fn new(capacity: usize, order: fn(&T, &T) -> Ordering) -> Self {
		Self { items: Vec::with_capacity(capacity + 1), capacity, order }
	}

	pub fn push(&mut self, item: T) {
		if self.capacity == 0 {
			return;
		}

		self.items.push(item);
		self.items.sort_by(self.order);
		self.items.truncate(self.capacity);
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn as_slice(&self) -> &[T] {
		&self.items
	}

	pub fn into_vec(self) -> Vec<T> {
		self.items
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn by_size_then_name(lhs: &(i64, &str), rhs: &(i64, &str)) -> Ordering {
		rhs.0.cmp(&lhs.0).then_with(|| lhs.1.cmp(rhs.1))
	}

	#[test]
	fn keeps_largest_items_in_order() {
		let mut top: BoundedTopK<(i64, &str)> = BoundedTopK::new(3, by_size_then_name);

		for item in [(5, "e"), (9, "a"), (1, "z"), (9, "0"), (7, "m")] {
			top.push(item);
			assert!(top.len() <= 3);
		}

		assert_eq!(top.into_vec(), vec![(9, "0"), (9, "a"), (7, "m")]);
	}

	#[test]
	fn zero_capacity_stays_empty() {
		let mut top: BoundedTopK<(i64, &str)> = BoundedTopK::new(0, by_size_then_name);

		top.push((1, "a"));

		assert!(top.is_empty());
	}
}
