/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/


mod atomic_ref_tests;
mod concurrent_tests;
mod rw_spin_lock_tests;
mod scoped_token_tests;
