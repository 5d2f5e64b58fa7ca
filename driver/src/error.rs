use kernel::KernelError;

/// Classifies a store error into a [`KernelError`] context.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
