use ipc_schema::Args;

/// Callback invoked with the positional arguments of an inbound event.
pub type Callback = Box<dyn Fn(Args)>;

/// The host's message primitive.
///
/// Both operations are fire-and-forget. There is no unsubscribe: a callback
/// handed to [`HostBridge::on`] stays registered for the life of the page,
/// and [`HostBridge::emit`] gives no delivery guarantee.
pub trait HostBridge {
    /// Registers `callback` for every event the host delivers on `channel`.
    fn on(&self, channel: &str, callback: Callback);

    /// Forwards `channel` and its positional arguments to the host.
    fn emit(&self, channel: &str, args: Args);
}
