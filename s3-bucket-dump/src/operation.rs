/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

/// Bucket resolution against the buckets accessible to the caller
pub(crate) mod resolve_bucket;

/// Listing the keys to download
pub(crate) mod list_keys;

/// Types for the bucket dump operation
pub mod dump_bucket;

/// Container for maintaining context required to carry out a single operation.
///
/// `State` is whatever additional operation specific state is required for the operation.
#[derive(Debug)]
pub(crate) struct TransferContext<State> {
    handle: Arc<crate::client::Handle>,
    state: Arc<State>,
}

impl<State> TransferContext<State> {
    /// The object store to use for remote operations
    pub(crate) fn store(&self) -> &dyn crate::storage::ObjectStore {
        self.handle.config.store()
    }
}

impl<State> Clone for TransferContext<State> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            state: self.state.clone(),
        }
    }
}
