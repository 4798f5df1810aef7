use async_trait::async_trait;

/// A single stage of a pipeline component. Returning `None` drops the frame:
/// no later processor in the chain will see it.
#[async_trait]
pub trait FrameProcessor<F> {
    async fn process(&mut self, frame_data: F) -> Option<F>;
}

/// Scalar properties attached to a frame (timestamps, statistics).
pub trait FrameProperties<K, V> {
    fn set(&mut self, key: K, value: V);
    fn get(&self, key: &K) -> Option<V>;
}

/// Owned values that processors move in and out of a frame, typically
/// buffers pulled at the start of a stage and pushed back at its end.
pub trait PullableFrameProperties<K, V> {
    fn push(&mut self, key: K, value: V);
    fn pull(&mut self, key: &K) -> Option<V>;
}

/// Read-only access to a frame value without taking ownership.
pub trait BorrowFrameProperties<K, V> {
    fn get_ref(&self, key: &K) -> Option<&V>;
}

/// Mutable access to a frame value without taking ownership.
pub trait BorrowMutFrameProperties<K, V> {
    fn get_mut_ref(&mut self, key: &K) -> Option<&mut V>;
}

/// Error slot carried by a frame DTO. A reported error marks the frame for
/// diversion at the next error switch.
pub trait FrameError<E> {
    fn report_error(&mut self, error: E);
    fn get_error(&self) -> Option<E>;
}
