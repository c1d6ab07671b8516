//! Generates the arity-specific surface (2..=9 channels) on top of the
//! arity-generic core in [`crate::channel_set`] and [`crate::synchronizer`].
//!
//! One `macro_rules!` body, invoked once per arity, produces: the
//! `ChannelSet` impl for that tuple size, the `add_N` inherent methods on
//! `Synchronizer<(..)>`, a `SynchronizerN` alias and `synchronizerN` free
//! constructor, and an `InputBindingN` alias with its `connect_input`
//! method.

use std::sync::Arc;

use crate::binding::{ChannelSource, InputBinding};
use crate::channel_set::{ChannelSet, Projection};
use crate::error::ContractViolation;
use crate::synchronizer::Synchronizer;

macro_rules! impl_arity {
    ($arity:literal; $( $idx:tt : $m:ident : $src:ident ),+ $(,)?) => {
        paste::paste! {
            impl<$($m: Send + Sync + 'static),+> ChannelSet for ($($m,)+) {
                const ARITY: usize = $arity;
                type Partial = ($(Option<Arc<$m>>,)+);
                type Full = ($(Arc<$m>,)+);
                type Projections = ($(Projection<$m>,)+);

                fn empty_partial() -> Self::Partial {
                    ( $( None::<Arc<$m>>, )+ )
                }

                fn is_complete(partial: &Self::Partial) -> bool {
                    true $( && partial.$idx.is_some() )+
                }

                fn into_full(partial: Self::Partial) -> Self::Full {
                    ( $( partial.$idx.expect("is_complete was checked before into_full"), )+ )
                }
            }

            impl<$($m: Send + Sync + 'static),+> Synchronizer<($($m,)+)> {
                $(
                    /// Feeds one arrival from this channel into the synchronizer.
                    pub fn [<add_ $idx>](&self, msg: Arc<$m>) {
                        let key = (self.projections().$idx)(&msg);
                        self.inner.process(key, move |slot| slot.$idx = Some(msg));
                    }
                )+
            }

            /// Synchronizer specialized for this arity.
            pub type [<Synchronizer $arity>]<$($m),+> = Synchronizer<($($m,)+)>;

            /// Builds a synchronizer from positional projections instead of a
            /// tuple literal.
            pub fn [<synchronizer $arity>]<$($m: Send + Sync + 'static),+>(
                queue_size: usize,
                $( [<proj_ $idx>]: Projection<$m> ),+
            ) -> [<Synchronizer $arity>]<$($m),+> {
                Synchronizer::new(queue_size, ($( [<proj_ $idx>], )+))
            }

            /// Input binding specialized for this arity.
            pub type [<InputBinding $arity>]<$($m),+> = InputBinding<($($m,)+)>;

            impl<$($m: Send + Sync + 'static),+> InputBinding<($($m,)+)> {
                /// Atomically replaces every bound source: the old
                /// subscription tokens are dropped in the same step that
                /// installs the new ones.
                pub fn connect_input<$($src: ChannelSource<Message = $m> + 'static),+>(
                    &self,
                    sources: ($($src,)+),
                ) -> Result<(), ContractViolation> {
                    // Drop the old subscription tokens before registering any new
                    // one, so there is never a window where both the old and new
                    // sources feed this synchronizer.
                    self.disconnect();

                    let synchronizer = self.synchronizer.clone();
                    let mut handles: Vec<Box<dyn Send>> = Vec::new();
                    $(
                        let sync_clone = synchronizer.clone();
                        let sink: Arc<dyn Fn(Arc<$m>) + Send + Sync> =
                            Arc::new(move |msg| sync_clone.[<add_ $idx>](msg));
                        let handle = sources.$idx.register_sink(sink)?;
                        handles.push(handle);
                    )+
                    self.replace_handles(handles);
                    Ok(())
                }
            }
        }
    };
}

impl_arity!(2; 0:M0:S0, 1:M1:S1);
impl_arity!(3; 0:M0:S0, 1:M1:S1, 2:M2:S2);
impl_arity!(4; 0:M0:S0, 1:M1:S1, 2:M2:S2, 3:M3:S3);
impl_arity!(5; 0:M0:S0, 1:M1:S1, 2:M2:S2, 3:M3:S3, 4:M4:S4);
impl_arity!(6; 0:M0:S0, 1:M1:S1, 2:M2:S2, 3:M3:S3, 4:M4:S4, 5:M5:S5);
impl_arity!(7; 0:M0:S0, 1:M1:S1, 2:M2:S2, 3:M3:S3, 4:M4:S4, 5:M5:S5, 6:M6:S6);
impl_arity!(8; 0:M0:S0, 1:M1:S1, 2:M2:S2, 3:M3:S3, 4:M4:S4, 5:M5:S5, 6:M6:S6, 7:M7:S7);
impl_arity!(9; 0:M0:S0, 1:M1:S1, 2:M2:S2, 3:M3:S3, 4:M4:S4, 5:M5:S5, 6:M6:S6, 7:M7:S7, 8:M8:S8);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn arity_three_matches_and_fires_full_tuple() {
        let sync = synchronizer3::<u32, u32, u32>(
            10,
            Box::new(|m: &u32| (*m as i64).into()),
            Box::new(|m: &u32| (*m as i64).into()),
            Box::new(|m: &u32| (*m as i64).into()),
        );
        let fired = Arc::new(Mutex::new(Vec::new()));
        let fired_c = fired.clone();
        let _h = sync.register_callback(move |(a, b, c)| {
            fired_c.lock().unwrap().push((*a, *b, *c));
        });

        sync.add_0(Arc::new(7));
        sync.add_1(Arc::new(7));
        sync.add_2(Arc::new(7));

        assert_eq!(*fired.lock().unwrap(), vec![(7, 7, 7)]);
    }

    struct TestSource<M> {
        fire: Mutex<Option<Arc<dyn Fn(Arc<M>) + Send + Sync>>>,
    }

    impl<M: Send + Sync + 'static> TestSource<M> {
        fn new() -> Self {
            Self {
                fire: Mutex::new(None),
            }
        }

        fn emit(&self, msg: M) {
            if let Some(sink) = self.fire.lock().unwrap().as_ref() {
                sink(Arc::new(msg));
            }
        }
    }

    impl<M: Send + Sync + 'static> ChannelSource for TestSource<M> {
        type Message = M;

        fn register_sink(
            &self,
            sink: Arc<dyn Fn(Arc<Self::Message>) + Send + Sync>,
        ) -> Result<Box<dyn Send>, ContractViolation> {
            *self.fire.lock().unwrap() = Some(sink);
            Ok(Box::new(()))
        }
    }

    #[test]
    fn connect_input_wires_sources_through_to_add_n() {
        let sync = synchronizer2::<u32, u32>(
            10,
            Box::new(|m: &u32| (*m as i64).into()),
            Box::new(|m: &u32| (*m as i64).into()),
        );
        let fired = Arc::new(Mutex::new(Vec::new()));
        let fired_c = fired.clone();
        let _h = sync.register_callback(move |(a, b)| fired_c.lock().unwrap().push((*a, *b)));

        let binding = InputBinding::new(sync);
        let source_a = Arc::new(TestSource::<u32>::new());
        let source_b = Arc::new(TestSource::<u32>::new());
        binding
            .connect_input((source_a.clone(), source_b.clone()))
            .unwrap();

        source_a.emit(42);
        source_b.emit(42);

        assert_eq!(*fired.lock().unwrap(), vec![(42, 42)]);
    }
}
