mod copies;
mod isbn;
mod title;

pub use self::{copies::*, isbn::*, title::*};
use crate::entity::LibraryId;
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    isbn: Isbn,
    lib_id: LibraryId,
    title: BookTitle,
    authors: BookAuthors,
    publisher: BookPublisher,
    version: BookVersion,
    total_copies: TotalCopies,
    available_copies: AvailableCopies,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        isbn: Isbn,
        lib_id: LibraryId,
        title: BookTitle,
        authors: BookAuthors,
        publisher: BookPublisher,
        version: BookVersion,
        total_copies: TotalCopies,
        available_copies: AvailableCopies,
    ) -> Self {
        Self {
            isbn,
            lib_id,
            title,
            authors,
            publisher,
            version,
            total_copies,
            available_copies,
        }
    }

    /// A brand new catalog entry where every copy is on the shelf.
    pub fn catalog(
        isbn: Isbn,
        lib_id: LibraryId,
        metadata: BookMetadata,
        count: CopyCount,
    ) -> Self {
        let BookMetadata {
            title,
            authors,
            publisher,
            version,
        } = metadata;
        Self::new(
            isbn,
            lib_id,
            title,
            authors,
            publisher,
            version,
            TotalCopies::new(*count.as_ref()),
            AvailableCopies::new(*count.as_ref()),
        )
    }

    pub fn add_copies(mut self, count: CopyCount) -> error_stack::Result<Self, KernelError> {
        let count = *count.as_ref();
        let total = self.total_copies.as_ref().checked_add(count);
        let available = self.available_copies.as_ref().checked_add(count);
        let (Some(total), Some(available)) = (total, available) else {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("adding {count} copies overflows the counters")));
        };
        self.total_copies = TotalCopies::new(total);
        self.available_copies = AvailableCopies::new(available);
        Ok(self)
    }

    /// Only copies on the shelf can be removed; a copy on loan stays counted.
    pub fn remove_copies(mut self, count: CopyCount) -> error_stack::Result<Self, KernelError> {
        let count = *count.as_ref();
        let total = *self.total_copies.as_ref();
        let available = *self.available_copies.as_ref();
        if count > available || count > total {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "cannot remove {count} copies of {}: {available} of {total} on the shelf",
                self.isbn.as_ref()
            )));
        }
        self.total_copies = TotalCopies::new(total - count);
        self.available_copies = AvailableCopies::new(available - count);
        Ok(self)
    }

    pub fn reserve_copy(mut self) -> error_stack::Result<Self, KernelError> {
        let available = *self.available_copies.as_ref();
        if available <= 0 {
            return Err(Report::new(KernelError::Unavailable)
                .attach_printable(format!("no copy of {} left", self.isbn.as_ref())));
        }
        self.available_copies = AvailableCopies::new(available - 1);
        Ok(self)
    }

    pub fn release_copy(mut self) -> error_stack::Result<Self, KernelError> {
        let available = *self.available_copies.as_ref();
        if available >= *self.total_copies.as_ref() {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "every copy of {} is already on the shelf",
                self.isbn.as_ref()
            )));
        }
        self.available_copies = AvailableCopies::new(available + 1);
        Ok(self)
    }

    pub fn apply(mut self, patch: BookPatch) -> Self {
        let BookPatch {
            title,
            authors,
            publisher,
            version,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(authors) = authors {
            self.authors = authors;
        }
        if let Some(publisher) = publisher {
            self.publisher = publisher;
        }
        if let Some(version) = version {
            self.version = version;
        }
        self
    }

    pub fn is_depleted(&self) -> bool {
        *self.total_copies.as_ref() == 0
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookMetadata {
    pub title: BookTitle,
    pub authors: BookAuthors,
    pub publisher: BookPublisher,
    pub version: BookVersion,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BookPatch {
    pub title: Option<BookTitle>,
    pub authors: Option<BookAuthors>,
    pub publisher: Option<BookPublisher>,
    pub version: Option<BookVersion>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_none()
            && self.publisher.is_none()
            && self.version.is_none()
    }
}
