pub mod bucket_map {

    use std::fmt::Debug;

    /// Number of slots in every bucket. Must be a power of two so that the
    /// in-bucket slot can be selected with a mask instead of a modulo.
    pub const BUCKET_CAPACITY: usize = 8;

    /// Low bits of a key reserved for in-bucket addressing.
    const BUCKET_SLOT_BITS: usize = BUCKET_CAPACITY.trailing_zeros() as usize;

    /// Upper bound on consecutive growths for a single `set` call. A key
    /// whose shifted bits are a multiple of the bucket count stays in the
    /// same bucket across several doublings, but once the bucket count
    /// exceeds those shifted bits the key's bucket is shared by at most
    /// `BUCKET_CAPACITY` keys, so one doubling per key bit always frees a
    /// slot. Exceeding this bound therefore means the addressing or rehash
    /// accounting is broken, not that the caller inserted too much.
    const MAX_GROW_RETRIES: usize = usize::BITS as usize;

    /// Fixed-width unsigned integer usable as a key.
    ///
    /// Keys are their own hash: `bits` exposes the key's value for bucket and
    /// slot selection, equality on the key type itself decides matches.
    pub trait Key: Copy + Eq + Default + Debug {
        fn bits(self) -> usize;
    }

    macro_rules! impl_key {
        ($($t:ty),*) => {
            $(impl Key for $t {
                #[inline]
                fn bits(self) -> usize {
                    self as usize
                }
            })*
        };
    }

    impl_key!(u8, u16, u32, u64, usize);

    #[derive(Debug, Clone, Default)]
    struct Element<K, V>
    where
        K: Key,
        V: Default + Clone + Debug,
    {
        key: K,
        value: V,
        occupied: bool,
    }

    /// A flat hash map for unsigned integer keys.
    ///
    /// Storage is a single array of `capacity` slots partitioned into
    /// fixed-size buckets. A key's bucket and its preferred slot inside the
    /// bucket are both read straight out of the key's bits; collisions are
    /// resolved by a linear scan of the bucket, and a bucket that fills up
    /// doubles the whole table. The table never shrinks.
    #[derive(Debug, Clone)]
    pub struct BucketMap<K, V>
    where
        K: Key,
        V: Default + Clone + Debug,
    {
        len: usize,
        bucket_count: usize,
        elements: Vec<Element<K, V>>,
    }

    impl<K, V> Default for BucketMap<K, V>
    where
        K: Key,
        V: Default + Clone + Debug,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<K, V> BucketMap<K, V>
    where
        K: Key,
        V: Default + Clone + Debug,
    {
        pub const ELEMENT_SIZE: usize = std::mem::size_of::<Element<K, V>>();
        pub const MIN_BUCKET_COUNT: usize = 2;

        /// Largest power-of-two bucket count whose backing array still fits
        /// in an addressable allocation.
        pub const MAX_BUCKET_COUNT: usize = {
            let max_buckets = usize::MAX / Self::ELEMENT_SIZE / BUCKET_CAPACITY;
            1 << (usize::BITS as usize - 1 - max_buckets.leading_zeros() as usize)
        };

        pub fn new() -> Self {
            Self::with_bucket_count(Self::MIN_BUCKET_COUNT)
        }

        /// Creates a table with enough buckets to hold `capacity` slots,
        /// rounded up to the next power-of-two bucket count.
        pub fn with_capacity(capacity: usize) -> Self {
            let bucket_count = capacity
                .div_ceil(BUCKET_CAPACITY)
                .next_power_of_two()
                .clamp(Self::MIN_BUCKET_COUNT, Self::MAX_BUCKET_COUNT);
            Self::with_bucket_count(bucket_count)
        }

        fn with_bucket_count(bucket_count: usize) -> Self {
            Self {
                len: 0,
                bucket_count,
                elements: vec![Element::default(); bucket_count * BUCKET_CAPACITY],
            }
        }

        /// Flat offset of the first slot of the bucket owning `key`.
        ///
        /// The low `BUCKET_SLOT_BITS` bits select the slot inside the bucket,
        /// so they are shifted out before masking; a dense incrementing key
        /// sequence then spreads across buckets instead of piling onto one.
        #[inline]
        fn bucket_base(&self, key: K) -> usize {
            ((key.bits() >> BUCKET_SLOT_BITS) & (self.bucket_count - 1)) * BUCKET_CAPACITY
        }

        /// Preferred slot of `key` inside its bucket.
        #[inline]
        fn direct_slot(key: K) -> usize {
            key.bits() & (BUCKET_CAPACITY - 1)
        }

        /// Index of the occupied slot holding `key`, if any. The whole bucket
        /// is scanned because a collision may have displaced the key from its
        /// direct slot.
        #[inline]
        fn find(&self, key: K) -> Option<usize> {
            let base = self.bucket_base(key);
            self.elements[base..base + BUCKET_CAPACITY]
                .iter()
                .position(|e| e.occupied && e.key == key)
                .map(|slot| base + slot)
        }

        /// Returns the stored value, or `V::default()` when the key is absent.
        pub fn get(&self, key: K) -> V {
            match self.find(key) {
                Some(i) => self.elements[i].value.clone(),
                None => V::default(),
            }
        }

        /// Returns the stored value and whether the key was present. The
        /// value is `V::default()` and must be ignored when the flag is false.
        pub fn get_with_status(&self, key: K) -> (V, bool) {
            match self.find(key) {
                Some(i) => (self.elements[i].value.clone(), true),
                None => (V::default(), false),
            }
        }

        pub fn contains(&self, key: K) -> bool {
            self.find(key).is_some()
        }

        /// Inserts or overwrites the entry for `key`, returning the previous
        /// value on overwrite. A full bucket grows the whole table and
        /// retries; exceeding the retry bound is an invariant violation and
        /// panics rather than looping.
        pub fn set(&mut self, key: K, mut value: V) -> Option<V> {
            let mut grow_attempts = 0;
            loop {
                match self.try_emplace(key, value) {
                    Ok(previous) => {
                        if previous.is_none() {
                            self.len += 1;
                        }
                        return previous;
                    }
                    Err(rejected) => {
                        assert!(
                            grow_attempts < MAX_GROW_RETRIES,
                            "bucket overflow survived {} growths",
                            grow_attempts
                        );
                        value = rejected;
                        grow_attempts += 1;
                        self.grow();
                    }
                }
            }
        }

        /// Places `key` in its bucket without growing. Returns the previous
        /// value on overwrite, `Ok(None)` on a fresh insert (`len` is the
        /// caller's job), or hands `value` back when the bucket has no slot
        /// left for this key.
        ///
        /// The whole bucket is checked for the key before a free slot is
        /// taken: a key displaced from its direct slot must not be inserted a
        /// second time after a later delete frees that slot.
        fn try_emplace(&mut self, key: K, value: V) -> Result<Option<V>, V> {
            let base = self.bucket_base(key);
            let direct = base + Self::direct_slot(key);
            let mut free: Option<usize> = None;
            for i in base..base + BUCKET_CAPACITY {
                let e = &self.elements[i];
                if e.occupied {
                    if e.key == key {
                        let old = std::mem::replace(&mut self.elements[i].value, value);
                        return Ok(Some(old));
                    }
                } else if free.is_none() || i == direct {
                    free = Some(i);
                }
            }
            match free {
                Some(i) => {
                    self.elements[i] = Element {
                        key,
                        value,
                        occupied: true,
                    };
                    Ok(None)
                }
                None => Err(value),
            }
        }

        /// Doubles the bucket count and redistributes every live entry
        /// through the regular `set` path against the new geometry. May
        /// recurse if the larger table still overflows a bucket during
        /// reinsertion; the per-call retry bound in `set` still applies.
        fn grow(&mut self) {
            let new_bucket_count = self.bucket_count * 2;
            assert!(
                new_bucket_count <= Self::MAX_BUCKET_COUNT,
                "bucket map capacity exhausted"
            );
            let old_len = self.len;
            let old = std::mem::replace(
                &mut self.elements,
                vec![Element::default(); new_bucket_count * BUCKET_CAPACITY],
            );
            self.bucket_count = new_bucket_count;
            self.len = 0;
            for e in old {
                if e.occupied {
                    self.set(e.key, e.value);
                }
            }
            debug_assert_eq!(self.len, old_len, "growth lost or duplicated entries");
        }

        /// Removes and returns the entry for `key`. Deleting an absent key is
        /// a no-op. The slot is reusable immediately; the table never shrinks.
        pub fn delete(&mut self, key: K) -> Option<V> {
            let i = self.find(key)?;
            self.len -= 1;
            // Reset the whole slot so the raw storage carries no ghost keys.
            let e = std::mem::take(&mut self.elements[i]);
            Some(e.value)
        }

        /// Drops every entry but keeps the current geometry.
        pub fn clear(&mut self) {
            for e in self.elements.iter_mut() {
                if e.occupied {
                    *e = Element::default();
                }
            }
            self.len = 0;
        }

        pub fn len(&self) -> usize {
            self.len
        }

        pub fn is_empty(&self) -> bool {
            self.len == 0
        }

        /// Total slot count, occupied or not.
        pub fn capacity(&self) -> usize {
            self.bucket_count * BUCKET_CAPACITY
        }

        pub fn load_factor(&self) -> f64 {
            self.len as f64 / self.capacity() as f64
        }
    }

}
